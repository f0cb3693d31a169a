//! Dense layer with momentum buffers.
use crate::activations::ActivationKind;
use rand::Rng;

/// Matrix type
pub type Matrix = Vec<Vec<f64>>;

/// A fully-connected layer. `weights` is `[output][input]`; the bias plays the
/// role of a constant 1.0 input unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub bias: Vec<f64>,
    last_weight_change: Matrix,
    last_bias_change: Vec<f64>,
}

impl DenseLayer {
    /// New layer with weights and bias drawn uniformly from [-1, 1).
    pub fn new<R: Rng>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let weights: Matrix = (0..output_size)
            .map(|_| (0..input_size).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let bias = (0..output_size).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Self::from_parts(weights, bias)
    }

    /// Layer from stored parameters, momentum reset.
    pub fn from_parts(weights: Matrix, bias: Vec<f64>) -> Self {
        let last_weight_change = weights.iter().map(|row| vec![0.0; row.len()]).collect();
        let last_bias_change = vec![0.0; bias.len()];
        Self { weights, bias, last_weight_change, last_bias_change }
    }

    pub fn input_size(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_size(&self) -> usize {
        self.bias.len()
    }

    /// `act(W·x + b)`
    pub fn forward(&self, input: &[f64], activation: ActivationKind) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, &b)| {
                let z = row.iter().zip(input).map(|(&w, &i)| w * i).sum::<f64>() + b;
                activation.apply(z)
            })
            .collect()
    }

    /// `W^T · deltas`, the error signal reaching this layer's inputs.
    pub fn propagate(&self, deltas: &[f64]) -> Vec<f64> {
        let mut back = vec![0.0; self.input_size()];
        for (row, &d) in self.weights.iter().zip(deltas) {
            for (acc, &w) in back.iter_mut().zip(row) {
                *acc += w * d;
            }
        }
        back
    }

    /// `w += lr * change + momentum * last_change` with `change = delta * input`.
    pub fn update(&mut self, input: &[f64], deltas: &[f64], lr: f64, momentum: f64) {
        for (i, &d) in deltas.iter().enumerate() {
            for (j, &x) in input.iter().enumerate() {
                let change = d * x;
                self.weights[i][j] += lr * change + momentum * self.last_weight_change[i][j];
                self.last_weight_change[i][j] = change;
            }
            self.bias[i] += lr * d + momentum * self.last_bias_change[i];
            self.last_bias_change[i] = d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn init_is_bounded_and_seeded() {
        let a = DenseLayer::new(5, 3, &mut StdRng::seed_from_u64(7));
        let b = DenseLayer::new(5, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!((a.input_size(), a.output_size()), (5, 3));
        assert!(a.weights.iter().flatten().chain(&a.bias).all(|w| (-1.0..1.0).contains(w)));
    }

    #[test]
    fn forward_applies_weights_and_bias() {
        let layer = DenseLayer::from_parts(vec![vec![1.0, -1.0]], vec![0.5]);
        let out = layer.forward(&[2.0, 1.0], ActivationKind::Tanh);
        assert_relative_eq!(out[0], 1.5f64.tanh());
    }

    #[test]
    fn update_uses_momentum_from_previous_step() {
        let mut layer = DenseLayer::from_parts(vec![vec![0.0]], vec![0.0]);
        layer.update(&[1.0], &[1.0], 0.5, 0.1);
        assert_relative_eq!(layer.weights[0][0], 0.5);
        layer.update(&[1.0], &[1.0], 0.5, 0.1);
        // 0.5 + 0.5 * 1.0 + 0.1 * 1.0
        assert_relative_eq!(layer.weights[0][0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(layer.bias[0], 1.1, epsilon = 1e-12);
    }

    #[test]
    fn propagate_is_transpose_product() {
        let layer = DenseLayer::from_parts(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![0.0, 0.0]);
        assert_eq!(layer.propagate(&[1.0, 1.0]), vec![4.0, 6.0]);
    }
}
