// ml_runner/src/main.rs
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use classic_ml::{run, Algorithm, DatasetKind, KnnDistance, RunConfig};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Knn,
    Nn,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DatasetArg {
    Iris,
    Mnist,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DistanceArg {
    Euclidean,
    Manhattan,
    Cosine,
}

#[derive(Parser, Debug)]
#[command(name = "ml-runner")]
#[command(about = "Train kNN or a feed-forward network on IRIS or MNIST, print a confusion matrix")]
#[command(version)]
struct Cli {
    /// Classifier to evaluate
    #[arg(value_enum)]
    algorithm: AlgorithmArg,

    /// Dataset to load
    #[arg(value_enum)]
    dataset: DatasetArg,

    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding iris.csv and the MNIST .gz files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output path of the trained network (nn only)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed for the split and the initial weights
    #[arg(long)]
    seed: Option<u64>,

    /// Neighbours consulted by kNN
    #[arg(short, long)]
    k: Option<usize>,

    /// kNN distance
    #[arg(long, value_enum)]
    distance: Option<DistanceArg>,

    /// Hidden layer size
    #[arg(long)]
    hidden: Option<usize>,

    /// Training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Momentum factor
    #[arg(long)]
    momentum: Option<f64>,

    /// Maximum MNIST rows to load
    #[arg(long)]
    max_rows: Option<usize>,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(k) = self.k {
            config.knn.k = k;
        }
        if let Some(distance) = self.distance {
            config.knn.distance = match distance {
                DistanceArg::Euclidean => KnnDistance::Euclidean,
                DistanceArg::Manhattan => KnnDistance::Manhattan,
                DistanceArg::Cosine => KnnDistance::Cosine,
            };
        }
        if let Some(hidden) = self.hidden {
            config.nn.hidden_size = hidden;
        }
        if let Some(epochs) = self.epochs {
            config.nn.epochs = epochs;
        }
        if let Some(lr) = self.learning_rate {
            config.nn.learning_rate = lr;
        }
        if let Some(m) = self.momentum {
            config.nn.momentum = m;
        }
        if let Some(max) = self.max_rows {
            config.knn_mnist_rows = max;
            config.nn_mnist_rows = max;
        }
        Ok(config)
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let config = cli.run_config()?;
    log::debug!("{:?}", config);
    let algorithm = match cli.algorithm {
        AlgorithmArg::Knn => Algorithm::Knn,
        AlgorithmArg::Nn => Algorithm::Nn,
    };
    let dataset = match cli.dataset {
        DatasetArg::Iris => DatasetKind::Iris,
        DatasetArg::Mnist => DatasetKind::Mnist,
    };
    run(algorithm, dataset, &config)
        .with_context(|| format!("{:?} on {:?} failed", cli.algorithm, cli.dataset))?;
    Ok(())
}

/// Parse `args` and run. Returns the process exit status: 0 on success or
/// help, 1 on a usage error, 2 when the run itself fails.
fn run_cli<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{}", e);
            }
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    match execute(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{:#}", e);
            2
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    ExitCode::from(run_cli(std::env::args_os()))
}
