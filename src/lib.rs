//! Classification harness for the IRIS and MNIST datasets.
//!
//! - Loaders for IRIS (delimited text) and MNIST (gzip IDX)
//! - Dataset adapters turning a generic grid into one-hot training pairs
//! - A feed-forward network wrapper and a linear-search kNN
//! - Train/test split, confusion matrix and summary printing

pub mod activations;
pub mod adapters;
pub mod classifier;
pub mod config;
pub mod datasets;
pub mod error;
pub mod evaluation;
pub mod grid;
pub mod knn;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod utils;

pub use activations::ActivationKind;
pub use adapters::{DatasetAdapter, Iris, Mnist, TrainingPair};
pub use classifier::{Classifier, NnClassifier, NnParams};
pub use config::{KnnParams, RunConfig};
pub use datasets::{load_csv, load_iris, load_mnist};
pub use error::{Error, Result};
pub use evaluation::{evaluate, run, Algorithm, DatasetKind};
pub use grid::{Attribute, AttributeKind, DataGrid, Row};
pub use knn::{KnnClassifier, KnnDistance};
pub use metrics::ConfusionMatrix;
pub use network::FeedForward;
pub use utils::train_test_split;
