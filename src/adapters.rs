//! Bridges between a [`DataGrid`] and the flat `(x, y)` vectors the
//! feed-forward network trains on.
//!
//! Each dataset has a fixed class registry. Targets are one-hot vectors of
//! length `classes + 1`: the last slot is reserved for labels outside the
//! registry.
use crate::error::{Error, Result};
use crate::grid::DataGrid;

/// Feature vector and one-hot target.
pub type TrainingPair = (Vec<f64>, Vec<f64>);

pub const IRIS_CLASSES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

pub const MNIST_CLASSES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Name returned for the reserved slot.
pub const UNKNOWN_CLASS: &str = "unknown";

/// Dataset-specific conversion strategy used by [`crate::NnClassifier`].
pub trait DatasetAdapter: std::fmt::Debug + Send + Sync {
    /// Class registry; position is the class id.
    fn class_names(&self) -> &'static [&'static str];

    /// Length of every target vector: registry size plus the reserved slot.
    fn target_len(&self) -> usize {
        self.class_names().len() + 1
    }

    /// One-hot target for `label`; unknown labels set the reserved slot.
    fn encode_label(&self, label: &str) -> Vec<f64> {
        let names = self.class_names();
        let idx = names.iter().position(|&n| n == label).unwrap_or(names.len());
        one_hot(idx, self.target_len())
    }

    /// Convert every row to a training pair: all columns but the class
    /// column as features, the class label one-hot encoded.
    fn to_training_pairs(&self, grid: &DataGrid) -> Result<Vec<TrainingPair>> {
        if grid.feature_count() == 0 {
            return Err(Error::data("dataset has no feature columns"));
        }
        Ok(grid
            .rows()
            .iter()
            .map(|row| (row.features.clone(), self.encode_label(&row.label)))
            .collect())
    }

    /// Class name at the arg-max of `y`; `"unknown"` for the reserved slot.
    fn resolve_class_name(&self, y: &[f64]) -> &'static str {
        argmax(y)
            .and_then(|i| self.class_names().get(i).copied())
            .unwrap_or(UNKNOWN_CLASS)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Iris;

impl DatasetAdapter for Iris {
    fn class_names(&self) -> &'static [&'static str] {
        &IRIS_CLASSES
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mnist;

impl DatasetAdapter for Mnist {
    fn class_names(&self) -> &'static [&'static str] {
        &MNIST_CLASSES
    }
}

/// One-hot encode
pub fn one_hot(idx: usize, len: usize) -> Vec<f64> {
    let mut v = vec![0.0; len];
    if let Some(slot) = v.get_mut(idx) {
        *slot = 1.0;
    }
    v
}

/// Index of the largest value, first occurrence on ties.
pub fn argmax(y: &[f64]) -> Option<usize> {
    let (first, rest) = y.split_first()?;
    let mut best = 0;
    let mut max = *first;
    for (i, &v) in rest.iter().enumerate() {
        if v > max {
            max = v;
            best = i + 1;
        }
    }
    Some(best)
}
