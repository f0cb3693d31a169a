//! Single-hidden-layer feed-forward network trained by online
//! back-propagation with momentum, plus JSON persistence.
use crate::activations::ActivationKind;
use crate::adapters::TrainingPair;
use crate::error::{Error, Result};
use crate::layers::DenseLayer;
use crate::loss::half_squared_error;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Epoch interval between error reports.
const REPORT_EVERY: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedForward {
    hidden: DenseLayer,
    output: DenseLayer,
    activation: ActivationKind,
}

impl FeedForward {
    /// Random network of shape `inputs -> hiddens -> outputs`.
    pub fn new<R: Rng>(
        inputs: usize,
        hiddens: usize,
        outputs: usize,
        activation: ActivationKind,
        rng: &mut R,
    ) -> Self {
        let hidden = DenseLayer::new(inputs, hiddens, rng);
        let output = DenseLayer::new(hiddens, outputs, rng);
        Self { hidden, output, activation }
    }

    pub fn input_size(&self) -> usize {
        self.hidden.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden.output_size()
    }

    pub fn output_size(&self) -> usize {
        self.output.output_size()
    }

    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    /// Forward pass.
    pub fn update(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size() {
            return Err(Error::data(format!(
                "input has {} values, network expects {}",
                input.len(),
                self.input_size()
            )));
        }
        let hidden = self.hidden.forward(input, self.activation);
        Ok(self.output.forward(&hidden, self.activation))
    }

    /// One back-propagation step on a single pattern. Returns the pattern's
    /// half squared error measured before the weights move.
    pub fn back_propagate(
        &mut self,
        input: &[f64],
        target: &[f64],
        lr: f64,
        momentum: f64,
    ) -> f64 {
        let act = self.activation;
        let hidden = self.hidden.forward(input, act);
        let out = self.output.forward(&hidden, act);

        let output_deltas: Vec<f64> = out
            .iter()
            .zip(target)
            .map(|(&o, &t)| act.derivative_from_output(o) * (t - o))
            .collect();
        // Hidden deltas use the output weights before they are updated.
        let hidden_deltas: Vec<f64> = self
            .output
            .propagate(&output_deltas)
            .iter()
            .zip(&hidden)
            .map(|(&e, &h)| act.derivative_from_output(h) * e)
            .collect();

        self.output.update(&hidden, &output_deltas, lr, momentum);
        self.hidden.update(input, &hidden_deltas, lr, momentum);

        half_squared_error(&out, target)
    }

    /// Run `epochs` passes over `patterns` in order. Returns the summed error
    /// of every epoch.
    pub fn train(
        &mut self,
        patterns: &[TrainingPair],
        epochs: usize,
        lr: f64,
        momentum: f64,
        verbose: bool,
    ) -> Result<Vec<f64>> {
        if patterns.is_empty() {
            return Err(Error::data("training set is empty"));
        }
        for (i, (x, y)) in patterns.iter().enumerate() {
            if x.len() != self.input_size() || y.len() != self.output_size() {
                return Err(Error::data(format!(
                    "pattern {} is {}->{}, network is {}->{}",
                    i,
                    x.len(),
                    y.len(),
                    self.input_size(),
                    self.output_size()
                )));
            }
        }

        let mut errors = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let error: f64 = patterns
                .iter()
                .map(|(x, y)| self.back_propagate(x, y, lr, momentum))
                .sum();
            if epoch % REPORT_EVERY == 0 {
                if verbose {
                    info!("epoch {}: error {:.6}", epoch, error);
                } else {
                    debug!("epoch {}: error {:.6}", epoch, error);
                }
            }
            errors.push(error);
        }
        Ok(errors)
    }

    /// Save topology and weights as JSON, overwriting `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, &FeedForwardDto::from_network(self))?;
        w.flush()?;
        Ok(())
    }

    /// Load a network written by [`FeedForward::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let dto: FeedForwardDto = serde_json::from_reader(BufReader::new(file))?;
        dto.into_network()
    }
}

impl fmt::Display for FeedForward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeedForward: [{}, {}, {}] ({:?})",
            self.input_size(),
            self.hidden_size(),
            self.output_size(),
            self.activation
        )
    }
}

// ============ Persistence DTOs ============

#[derive(Debug, Serialize, Deserialize)]
struct LayerDto {
    weights: Vec<Vec<f64>>, // [output_size][input_size]
    bias: Vec<f64>,         // [output_size]
}

#[derive(Debug, Serialize, Deserialize)]
struct FeedForwardDto {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    activation: ActivationKind,
    hidden: LayerDto,
    output: LayerDto,
}

impl LayerDto {
    fn from_layer(layer: &DenseLayer) -> Self {
        Self { weights: layer.weights.clone(), bias: layer.bias.clone() }
    }

    fn into_layer(self, inputs: usize, outputs: usize, name: &str) -> Result<DenseLayer> {
        let shape_ok = self.bias.len() == outputs
            && self.weights.len() == outputs
            && self.weights.iter().all(|row| row.len() == inputs);
        if !shape_ok {
            return Err(Error::format(format!(
                "{} layer weights do not match {}x{}",
                name, outputs, inputs
            )));
        }
        Ok(DenseLayer::from_parts(self.weights, self.bias))
    }
}

impl FeedForwardDto {
    fn from_network(ff: &FeedForward) -> Self {
        Self {
            input_size: ff.input_size(),
            hidden_size: ff.hidden_size(),
            output_size: ff.output_size(),
            activation: ff.activation,
            hidden: LayerDto::from_layer(&ff.hidden),
            output: LayerDto::from_layer(&ff.output),
        }
    }

    fn into_network(self) -> Result<FeedForward> {
        let hidden = self.hidden.into_layer(self.input_size, self.hidden_size, "hidden")?;
        let output = self.output.into_layer(self.hidden_size, self.output_size, "output")?;
        Ok(FeedForward { hidden, output, activation: self.activation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn xor() -> Vec<TrainingPair> {
        vec![
            (vec![0.0, 0.0], vec![0.0]),
            (vec![0.0, 1.0], vec![1.0]),
            (vec![1.0, 0.0], vec![1.0]),
            (vec![1.0, 1.0], vec![0.0]),
        ]
    }

    #[test]
    fn shape_accessors() {
        let ff = FeedForward::new(4, 7, 3, ActivationKind::Sigmoid, &mut StdRng::seed_from_u64(1));
        assert_eq!((ff.input_size(), ff.hidden_size(), ff.output_size()), (4, 7, 3));
        assert_eq!(ff.update(&[0.0; 4]).unwrap().len(), 3);
        assert!(ff.update(&[0.0; 3]).is_err());
    }

    #[test]
    fn training_reduces_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ff = FeedForward::new(2, 4, 1, ActivationKind::Sigmoid, &mut rng);
        let errors = ff.train(&xor(), 2000, 0.6, 0.4, false).unwrap();
        assert_eq!(errors.len(), 2000);
        assert!(errors[1999] < errors[0]);
    }

    #[test]
    fn training_rejects_bad_shapes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ff = FeedForward::new(3, 2, 1, ActivationKind::Sigmoid, &mut rng);
        assert!(matches!(ff.train(&xor(), 1, 0.5, 0.5, false), Err(Error::Data(_))));
        assert!(matches!(ff.train(&[], 1, 0.5, 0.5, false), Err(Error::Data(_))));
    }

    #[test]
    fn save_load_keeps_weights() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let ff = FeedForward::new(3, 5, 2, ActivationKind::Tanh, &mut StdRng::seed_from_u64(9));
        ff.save(&path).unwrap();
        let loaded = FeedForward::load(&path).unwrap();
        assert_eq!(loaded, ff);
        assert_eq!(loaded.update(&[0.1, 0.2, 0.3]).unwrap(), ff.update(&[0.1, 0.2, 0.3]).unwrap());
    }

    #[test]
    fn load_rejects_inconsistent_shapes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"input_size":2,"hidden_size":1,"output_size":1,"activation":"Sigmoid",
               "hidden":{"weights":[[0.1]],"bias":[0.0]},
               "output":{"weights":[[0.2]],"bias":[0.0]}}"#,
        )
        .unwrap();
        assert!(matches!(FeedForward::load(&path), Err(Error::Format(_))));
    }
}
