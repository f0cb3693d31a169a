//! Confusion matrix and the per-class summary derived from it.
use crate::error::{Error, Result};
use crate::grid::DataGrid;
use std::collections::BTreeMap;
use std::fmt;

/// true class -> predicted class -> count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    cells: BTreeMap<String, BTreeMap<String, usize>>,
}

impl ConfusionMatrix {
    /// Compare the labels of `reference` against `predictions` row by row.
    pub fn from_grids(reference: &DataGrid, predictions: &DataGrid) -> Result<Self> {
        if reference.len() != predictions.len() {
            return Err(Error::data(format!(
                "{} reference rows but {} predictions",
                reference.len(),
                predictions.len()
            )));
        }
        let mut cm = Self::default();
        for (truth, pred) in reference.labels().zip(predictions.labels()) {
            cm.record(truth, pred);
        }
        Ok(cm)
    }

    pub fn record(&mut self, truth: &str, predicted: &str) {
        *self
            .cells
            .entry(truth.to_string())
            .or_default()
            .entry(predicted.to_string())
            .or_default() += 1;
    }

    pub fn get(&self, truth: &str, predicted: &str) -> usize {
        self.cells
            .get(truth)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    /// Reference classes, i.e. the classes that occur as true labels.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn true_positives(&self, class: &str) -> usize {
        self.get(class, class)
    }

    /// Rows of other classes predicted as `class`.
    pub fn false_positives(&self, class: &str) -> usize {
        self.cells
            .iter()
            .filter(|(truth, _)| truth.as_str() != class)
            .map(|(_, row)| row.get(class).copied().unwrap_or(0))
            .sum()
    }

    /// Rows of `class` predicted as something else.
    pub fn false_negatives(&self, class: &str) -> usize {
        self.cells
            .get(class)
            .map(|row| {
                row.iter()
                    .filter(|(pred, _)| pred.as_str() != class)
                    .map(|(_, &n)| n)
                    .sum::<usize>()
            })
            .unwrap_or(0)
    }

    /// Rows where neither the truth nor the prediction is `class`.
    pub fn true_negatives(&self, class: &str) -> usize {
        self.cells
            .iter()
            .filter(|(truth, _)| truth.as_str() != class)
            .flat_map(|(_, row)| row.iter())
            .filter(|(pred, _)| pred.as_str() != class)
            .map(|(_, &n)| n)
            .sum()
    }

    pub fn precision(&self, class: &str) -> f64 {
        let tp = self.true_positives(class);
        ratio(tp, tp + self.false_positives(class))
    }

    pub fn recall(&self, class: &str) -> f64 {
        let tp = self.true_positives(class);
        ratio(tp, tp + self.false_negatives(class))
    }

    pub fn f1_score(&self, class: &str) -> f64 {
        let (p, r) = (self.precision(class), self.recall(class));
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    pub fn accuracy(&self) -> f64 {
        let correct: usize = self.classes().map(|c| self.true_positives(c)).sum();
        ratio(correct, self.total())
    }

    /// Human-readable per-class table plus overall accuracy.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.classes().map(str::len).max().unwrap_or(0).max(15);
        writeln!(
            f,
            "{:<width$}  {:>14}  {:>15}  {:>14}  {:>9}  {:>6}  {:>8}",
            "Reference Class",
            "True Positives",
            "False Positives",
            "True Negatives",
            "Precision",
            "Recall",
            "F1 Score",
            width = width
        )?;
        writeln!(
            f,
            "{:<width$}  {:>14}  {:>15}  {:>14}  {:>9}  {:>6}  {:>8}",
            "-".repeat(15),
            "-".repeat(14),
            "-".repeat(15),
            "-".repeat(14),
            "-".repeat(9),
            "-".repeat(6),
            "-".repeat(8),
            width = width
        )?;
        for class in self.classes() {
            writeln!(
                f,
                "{:<width$}  {:>14}  {:>15}  {:>14}  {:>9.4}  {:>6.4}  {:>8.4}",
                class,
                self.true_positives(class),
                self.false_positives(class),
                self.true_negatives(class),
                self.precision(class),
                self.recall(class),
                self.f1_score(class),
                width = width
            )?;
        }
        writeln!(f, "Overall accuracy: {:.4}", self.accuracy())
    }
}
