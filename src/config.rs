//! Run configuration: file locations, split fractions and classifier
//! hyperparameters. Every field has a default, so a JSON config file only
//! needs the keys it overrides.
use crate::classifier::NnParams;
use crate::error::Result;
use crate::knn::KnnDistance;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnParams {
    pub k: usize,
    pub distance: KnnDistance,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { k: 2, distance: KnnDistance::Euclidean }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub iris_file: String,
    pub mnist_image_file: String,
    pub mnist_label_file: String,
    /// Where the trained network is written after an NN run.
    pub model_path: PathBuf,
    /// Seed for the train/test shuffle and, unless `nn.seed` is set, the
    /// network's initial weights.
    pub seed: Option<u64>,
    pub iris_train_fraction: f64,
    pub mnist_train_fraction: f64,
    /// MNIST rows loaded for kNN runs.
    pub knn_mnist_rows: usize,
    /// MNIST rows loaded for NN runs.
    pub nn_mnist_rows: usize,
    pub knn: KnnParams,
    pub nn: NnParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dataset"),
            iris_file: "iris.csv".to_string(),
            mnist_image_file: "train-images-idx3-ubyte.gz".to_string(),
            mnist_label_file: "train-labels-idx1-ubyte.gz".to_string(),
            model_path: PathBuf::from("model.json"),
            seed: Some(1),
            iris_train_fraction: 0.5,
            mnist_train_fraction: 0.9,
            knn_mnist_rows: 10_000,
            nn_mnist_rows: 1_000,
            knn: KnnParams::default(),
            nn: NnParams { verbose: true, ..NnParams::default() },
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn iris_path(&self) -> PathBuf {
        self.data_dir.join(&self.iris_file)
    }

    pub fn mnist_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.data_dir.join(&self.mnist_image_file),
            self.data_dir.join(&self.mnist_label_file),
        )
    }
}
