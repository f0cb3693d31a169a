//! Evaluation drivers: load, split, fit, predict, score.
use crate::adapters::{Iris, Mnist};
use crate::classifier::{Classifier, NnClassifier};
use crate::config::RunConfig;
use crate::datasets::{load_iris, load_mnist};
use crate::error::Result;
use crate::grid::DataGrid;
use crate::knn::KnnClassifier;
use crate::metrics::ConfusionMatrix;
use crate::utils::{print_grid_size, timed, train_test_split};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Knn,
    Nn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Iris,
    Mnist,
}

/// Fit on `train`, predict `test`, print and return the confusion matrix.
pub fn evaluate(
    train: &DataGrid,
    test: &DataGrid,
    classifier: &mut dyn Classifier,
) -> Result<ConfusionMatrix> {
    let (fitted, elapsed) = timed(|| classifier.fit(train));
    fitted?;
    println!("elapsed time to fit : {:?}", elapsed);

    let (predictions, elapsed) = timed(|| classifier.predict(test));
    let predictions = predictions?;
    println!("elapsed time to predict : {:?}", elapsed);

    let cm = ConfusionMatrix::from_grids(test, &predictions)?;
    println!("{}", classifier.name());
    println!("{}", cm);
    Ok(cm)
}

/// Load `dataset`, split it, and evaluate `algorithm` on it. NN runs also
/// write the trained network to `config.model_path`.
pub fn run(
    algorithm: Algorithm,
    dataset: DatasetKind,
    config: &RunConfig,
) -> Result<ConfusionMatrix> {
    let (loaded, elapsed) = timed(|| load(algorithm, dataset, config));
    let grid = loaded?;
    println!("elapsed time of loading : {:?}", elapsed);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let train_fraction = match dataset {
        DatasetKind::Iris => config.iris_train_fraction,
        DatasetKind::Mnist => config.mnist_train_fraction,
    };
    let (split, elapsed) = timed(|| train_test_split(&grid, train_fraction, &mut rng));
    let (train, test) = split?;
    println!("elapsed time of splitting : {:?}", elapsed);
    print_grid_size("trainData", &train);
    print_grid_size("testData", &test);

    match algorithm {
        Algorithm::Knn => {
            let mut knn = KnnClassifier::new(config.knn.distance, config.knn.k);
            evaluate(&train, &test, &mut knn)
        }
        Algorithm::Nn => {
            let mut params = config.nn.clone();
            params.seed = params.seed.or(config.seed);
            let mut nn = match dataset {
                DatasetKind::Iris => NnClassifier::new(params, Iris),
                DatasetKind::Mnist => NnClassifier::new(params, Mnist),
            };
            let cm = evaluate(&train, &test, &mut nn)?;
            nn.save(&config.model_path)?;
            info!("model written to {}", config.model_path.display());
            Ok(cm)
        }
    }
}

fn load(algorithm: Algorithm, dataset: DatasetKind, config: &RunConfig) -> Result<DataGrid> {
    match dataset {
        DatasetKind::Iris => load_iris(config.iris_path()),
        DatasetKind::Mnist => {
            let (images, labels) = config.mnist_paths();
            let max = match algorithm {
                Algorithm::Knn => config.knn_mnist_rows,
                Algorithm::Nn => config.nn_mnist_rows,
            };
            load_mnist(images, labels, max)
        }
    }
}
