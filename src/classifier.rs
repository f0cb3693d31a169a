//! Classifier contract and the feed-forward network wrapper.
use crate::activations::ActivationKind;
use crate::adapters::DatasetAdapter;
use crate::error::{Error, Result};
use crate::grid::DataGrid;
use crate::network::FeedForward;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything the evaluation driver can fit on one grid and predict on another.
pub trait Classifier {
    /// Title printed above the evaluation summary.
    fn name(&self) -> &str;

    fn fit(&mut self, train: &DataGrid) -> Result<()>;

    /// Prediction vector with one class label per row of `data`, same order.
    fn predict(&self, data: &DataGrid) -> Result<DataGrid>;
}

/// Hyperparameters of [`NnClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NnParams {
    pub hidden_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Momentum factor.
    pub momentum: f64,
    pub activation: ActivationKind,
    /// Report training error at info level instead of debug.
    pub verbose: bool,
    /// Weight initialisation seed; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for NnParams {
    fn default() -> Self {
        Self {
            hidden_size: 100,
            epochs: 5000,
            learning_rate: 0.4,
            momentum: 0.6,
            activation: ActivationKind::Sigmoid,
            verbose: false,
            seed: None,
        }
    }
}

impl NnParams {
    fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 {
            return Err(Error::Config { field: "hidden_size" });
        }
        if self.epochs == 0 {
            return Err(Error::Config { field: "epochs" });
        }
        if self.learning_rate == 0.0 {
            return Err(Error::Config { field: "learning_rate" });
        }
        if self.momentum == 0.0 {
            return Err(Error::Config { field: "momentum" });
        }
        Ok(())
    }
}

/// Feed-forward network classifier over a [`DataGrid`].
///
/// The dataset-specific conversions are delegated to the injected
/// [`DatasetAdapter`]; the trained network is owned exclusively by the
/// wrapper and replaced on every successful [`Classifier::fit`].
#[derive(Debug)]
pub struct NnClassifier {
    params: NnParams,
    network: Option<FeedForward>,
    adapter: Box<dyn DatasetAdapter>,
}

impl NnClassifier {
    pub fn new(params: NnParams, adapter: impl DatasetAdapter + 'static) -> Self {
        Self { params, network: None, adapter: Box::new(adapter) }
    }

    /// Restore a network written by [`NnClassifier::save`]. Hyperparameters
    /// start from their defaults, with the stored hidden size.
    pub fn load(path: impl AsRef<Path>, adapter: impl DatasetAdapter + 'static) -> Result<Self> {
        let network = FeedForward::load(path.as_ref())?;
        if network.output_size() != adapter.target_len() {
            return Err(Error::format(format!(
                "model has {} outputs, adapter expects {}",
                network.output_size(),
                adapter.target_len()
            )));
        }
        let params = NnParams {
            hidden_size: network.hidden_size(),
            activation: network.activation(),
            ..NnParams::default()
        };
        info!("loaded {} from {}", network, path.as_ref().display());
        Ok(Self { params, network: Some(network), adapter: Box::new(adapter) })
    }

    /// Write the trained network (topology and weights) as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let network = self.network.as_ref().ok_or(Error::NotTrained("save"))?;
        network.save(path)
    }

    pub fn params(&self) -> &NnParams {
        &self.params
    }

    pub fn network(&self) -> Option<&FeedForward> {
        self.network.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.network.is_some()
    }

    pub fn set_epochs(&mut self, epochs: usize) {
        self.params.epochs = epochs;
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.params.learning_rate = learning_rate;
    }

    pub fn set_momentum(&mut self, momentum: f64) {
        self.params.momentum = momentum;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.params.verbose = verbose;
    }

    pub fn set_adapter(&mut self, adapter: impl DatasetAdapter + 'static) {
        self.adapter = Box::new(adapter);
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }
}

impl Classifier for NnClassifier {
    fn name(&self) -> &str {
        "NN (feed-forward)"
    }

    fn fit(&mut self, train: &DataGrid) -> Result<()> {
        self.params.validate()?;
        let patterns = self.adapter.to_training_pairs(train)?;
        let (inputs, outputs) = match patterns.first() {
            Some((x, y)) => (x.len(), y.len()),
            None => return Err(Error::data("training set is empty")),
        };

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let p = &self.params;
        let mut network = FeedForward::new(inputs, p.hidden_size, outputs, p.activation, &mut rng);
        info!(
            "training {} on {} patterns for {} epochs (lr {}, momentum {})",
            network,
            patterns.len(),
            p.epochs,
            p.learning_rate,
            p.momentum
        );
        let errors = network.train(&patterns, p.epochs, p.learning_rate, p.momentum, p.verbose)?;
        if let Some(last) = errors.last() {
            info!("final epoch error {:.6}", last);
        }
        self.network = Some(network);
        Ok(())
    }

    fn predict(&self, data: &DataGrid) -> Result<DataGrid> {
        let network = self.network.as_ref().ok_or(Error::NotTrained("predict"))?;
        let patterns = self.adapter.to_training_pairs(data)?;
        let mut ret = data.prediction_vector();
        for (row, (x, _)) in patterns.iter().enumerate() {
            let y = network.update(x)?;
            ret.set_class(row, self.adapter.resolve_class_name(&y))?;
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{Iris, Mnist, IRIS_CLASSES, MNIST_CLASSES};
    use tempfile::TempDir;

    /// Three well separated clusters, each point repeated.
    fn clusters() -> DataGrid {
        let centers = [[0.1, 0.1], [0.9, 0.1], [0.5, 0.9]];
        let mut g = DataGrid::with_indexed_features(2);
        for _ in 0..4 {
            for (c, name) in centers.iter().zip(IRIS_CLASSES) {
                g.push_row(c.to_vec(), name).unwrap();
            }
        }
        g
    }

    fn small_params() -> NnParams {
        NnParams { hidden_size: 6, epochs: 500, seed: Some(42), ..NnParams::default() }
    }

    fn accuracy(truth: &DataGrid, pred: &DataGrid) -> f64 {
        let hits = truth.labels().zip(pred.labels()).filter(|(a, b)| a == b).count();
        hits as f64 / truth.len() as f64
    }

    #[test]
    fn zero_hyperparameters_name_the_field() {
        let g = clusters();
        let cases: [(fn(&mut NnParams), &str); 4] = [
            (|p: &mut NnParams| p.epochs = 0, "epochs"),
            (|p: &mut NnParams| p.learning_rate = 0.0, "learning_rate"),
            (|p: &mut NnParams| p.momentum = 0.0, "momentum"),
            (|p: &mut NnParams| p.hidden_size = 0, "hidden_size"),
        ];
        for (mutate, field) in cases {
            let mut params = small_params();
            mutate(&mut params);
            let mut cls = NnClassifier::new(params, Iris);
            match cls.fit(&g) {
                Err(Error::Config { field: f }) => assert_eq!(f, field),
                other => panic!("expected config error for {}, got {:?}", field, other),
            }
            assert!(!cls.is_trained());
        }
    }

    #[test]
    fn predict_before_fit_fails() {
        let cls = NnClassifier::new(small_params(), Iris);
        assert!(matches!(cls.predict(&clusters()), Err(Error::NotTrained(_))));
        assert!(matches!(cls.save("unused.json"), Err(Error::NotTrained(_))));
    }

    #[test]
    fn empty_training_set_is_data_error() {
        let mut cls = NnClassifier::new(small_params(), Iris);
        let empty = DataGrid::with_indexed_features(2);
        assert!(matches!(cls.fit(&empty), Err(Error::Data(_))));
    }

    #[test]
    fn seeded_fits_agree_and_beat_chance() {
        let g = clusters();
        let mut a = NnClassifier::new(small_params(), Iris);
        let mut b = NnClassifier::new(small_params(), Iris);
        a.fit(&g).unwrap();
        b.fit(&g).unwrap();
        let pa = a.predict(&g).unwrap();
        let pb = b.predict(&g).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(pa.len(), g.len());
        assert!(accuracy(&g, &pa) > 1.0 / IRIS_CLASSES.len() as f64);
    }

    #[test]
    fn topology_follows_first_pair() {
        let mut cls = NnClassifier::new(small_params(), Iris);
        cls.fit(&clusters()).unwrap();
        let net = cls.network().unwrap();
        assert_eq!((net.input_size(), net.hidden_size(), net.output_size()), (2, 6, 4));
    }

    #[test]
    fn failed_refit_keeps_previous_network() {
        let mut cls = NnClassifier::new(small_params(), Iris);
        cls.fit(&clusters()).unwrap();
        let before = cls.network().cloned();
        cls.set_epochs(0);
        assert!(cls.fit(&clusters()).is_err());
        assert_eq!(cls.network().cloned(), before);
    }

    #[test]
    fn setters_and_adapter_swap() {
        let mut cls = NnClassifier::new(NnParams::default(), Iris).with_seed(7);
        cls.set_epochs(20);
        cls.set_learning_rate(0.2);
        cls.set_momentum(0.1);
        cls.set_verbose(true);
        cls.set_adapter(Mnist);
        assert_eq!(cls.params().seed, Some(7));

        let mut digits = DataGrid::with_indexed_features(2);
        digits.push_row(vec![0.0, 1.0], "3").unwrap();
        digits.push_row(vec![1.0, 0.0], "7").unwrap();
        cls.fit(&digits).unwrap();
        assert_eq!(cls.network().unwrap().output_size(), 11);
        let pred = cls.predict(&digits).unwrap();
        assert!(pred.labels().all(|l| l == "unknown" || MNIST_CLASSES.contains(&l)));
    }

    #[test]
    fn loaded_model_predicts_like_trained_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let g = clusters();
        let mut cls = NnClassifier::new(small_params(), Iris);
        cls.fit(&g).unwrap();
        cls.save(&path).unwrap();

        let loaded = NnClassifier::load(&path, Iris).unwrap();
        assert_eq!(loaded.params().hidden_size, 6);
        assert_eq!(loaded.predict(&g).unwrap(), cls.predict(&g).unwrap());
        assert!(matches!(NnClassifier::load(&path, Mnist), Err(Error::Format(_))));
    }
}
