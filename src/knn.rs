//! Linear-search k-nearest-neighbours classifier.
use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::grid::DataGrid;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KnnDistance {
    #[default]
    Euclidean,
    Manhattan,
    Cosine,
}

impl KnnDistance {
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            KnnDistance::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            KnnDistance::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            KnnDistance::Cosine => cosine_distance(a, b),
        }
    }
}

impl FromStr for KnnDistance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "euclidean" => Ok(KnnDistance::Euclidean),
            "manhattan" => Ok(KnnDistance::Manhattan),
            "cosine" => Ok(KnnDistance::Cosine),
            _ => Err(Error::Config { field: "distance" }),
        }
    }
}

impl fmt::Display for KnnDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KnnDistance::Euclidean => "euclidean",
            KnnDistance::Manhattan => "manhattan",
            KnnDistance::Cosine => "cosine",
        };
        f.write_str(name)
    }
}

fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        // Two zero vectors are identical; one zero vector is maximally far.
        return if mag_a == mag_b { 0.0 } else { 1.0 };
    }
    1.0 - (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    distance: KnnDistance,
    training: Option<DataGrid>,
}

impl KnnClassifier {
    pub fn new(distance: KnnDistance, k: usize) -> Self {
        Self { k, distance, training: None }
    }

    /// Majority label among the `k` nearest training rows. Ties go to the
    /// label whose closest member is nearest.
    fn vote(&self, training: &DataGrid, x: &[f64]) -> String {
        let mut neighbours: Vec<(f64, &str)> = training
            .rows()
            .iter()
            .map(|row| (self.distance.distance(x, &row.features), row.label.as_str()))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));

        // label -> (votes, rank of its nearest member)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (rank, &(_, label)) in neighbours.iter().take(self.k).enumerate() {
            counts.entry(label).or_insert((0, rank)).0 += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(label, _)| label.to_string())
            .unwrap_or_default()
    }
}

impl Classifier for KnnClassifier {
    fn name(&self) -> &str {
        "kNN"
    }

    /// Stores the training rows; all the work happens in `predict`.
    fn fit(&mut self, train: &DataGrid) -> Result<()> {
        if self.k == 0 {
            return Err(Error::Config { field: "k" });
        }
        if train.is_empty() {
            return Err(Error::data("training set is empty"));
        }
        if train.len() < self.k {
            log::warn!("k = {} exceeds the {} training rows", self.k, train.len());
        }
        info!(
            "kNN fitted on {} rows (k = {}, {} distance, linear search)",
            train.len(),
            self.k,
            self.distance
        );
        self.training = Some(train.clone());
        Ok(())
    }

    fn predict(&self, data: &DataGrid) -> Result<DataGrid> {
        let training = self.training.as_ref().ok_or(Error::NotTrained("predict"))?;
        if data.feature_count() != training.feature_count() {
            return Err(Error::data(format!(
                "test rows have {} features, training rows have {}",
                data.feature_count(),
                training.feature_count()
            )));
        }
        let mut ret = data.prediction_vector();
        for (i, row) in data.rows().iter().enumerate() {
            ret.set_class(i, self.vote(training, &row.features))?;
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(rows: &[([f64; 2], &str)]) -> DataGrid {
        let mut g = DataGrid::with_indexed_features(2);
        for (x, label) in rows {
            g.push_row(x.to_vec(), *label).unwrap();
        }
        g
    }

    #[test]
    fn distances() {
        let (a, b) = ([0.0, 0.0], [3.0, 4.0]);
        assert_relative_eq!(KnnDistance::Euclidean.distance(&a, &b), 5.0);
        assert_relative_eq!(KnnDistance::Manhattan.distance(&a, &b), 7.0);
        assert_relative_eq!(KnnDistance::Cosine.distance(&[1.0, 0.0], &[0.0, 2.0]), 1.0);
        let parallel = KnnDistance::Cosine.distance(&[1.0, 1.0], &[2.0, 2.0]);
        assert_relative_eq!(parallel, 0.0, epsilon = 1e-12);
        assert_eq!(KnnDistance::Cosine.distance(&a, &a), 0.0);
    }

    #[test]
    fn parses_names() {
        assert_eq!("manhattan".parse::<KnnDistance>().unwrap(), KnnDistance::Manhattan);
        assert!("chebyshev".parse::<KnnDistance>().is_err());
    }

    #[test]
    fn majority_vote() {
        let train = grid(&[
            ([0.0, 0.0], "a"),
            ([0.1, 0.0], "a"),
            ([0.0, 0.1], "a"),
            ([5.0, 5.0], "b"),
            ([5.1, 5.0], "b"),
        ]);
        let mut knn = KnnClassifier::new(KnnDistance::Euclidean, 3);
        knn.fit(&train).unwrap();
        let test = grid(&[([0.2, 0.2], "?"), ([4.9, 5.2], "?")]);
        let pred = knn.predict(&test).unwrap();
        let labels: Vec<&str> = pred.labels().collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn tie_goes_to_nearest() {
        let train = grid(&[([0.0, 0.0], "near"), ([1.0, 0.0], "far")]);
        let mut knn = KnnClassifier::new(KnnDistance::Euclidean, 2);
        knn.fit(&train).unwrap();
        for _ in 0..10 {
            let pred = knn.predict(&grid(&[([0.2, 0.0], "?")])).unwrap();
            assert_eq!(pred.row(0).unwrap().label, "near");
        }
    }

    #[test]
    fn errors() {
        let train = grid(&[([0.0, 0.0], "a")]);
        let mut zero = KnnClassifier::new(KnnDistance::Euclidean, 0);
        assert!(matches!(zero.fit(&train), Err(Error::Config { field: "k" })));

        let knn = KnnClassifier::new(KnnDistance::Euclidean, 1);
        assert!(matches!(knn.predict(&train), Err(Error::NotTrained(_))));

        let mut knn = KnnClassifier::new(KnnDistance::Euclidean, 1);
        knn.fit(&train).unwrap();
        let wide = DataGrid::with_indexed_features(3);
        assert!(matches!(knn.predict(&wide), Err(Error::Data(_))));
    }
}
