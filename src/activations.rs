use serde::{Deserialize, Serialize};

/// Activation applied to hidden and output units. Serialized with the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ActivationKind {
    /// 1 / (1 + exp(-x))
    #[default]
    Sigmoid,
    /// (exp(x) - exp(-x)) / (exp(x) + exp(-x))
    Tanh,
}

impl ActivationKind {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationKind::Tanh => x.tanh(),
        }
    }

    /// Derivative expressed through the activated value `y = apply(x)`.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => y * (1.0 - y),
            ActivationKind::Tanh => 1.0 - y * y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_midpoint() {
        let s = ActivationKind::Sigmoid;
        assert_relative_eq!(s.apply(0.0), 0.5);
        assert_relative_eq!(s.derivative_from_output(0.5), 0.25);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for kind in [ActivationKind::Sigmoid, ActivationKind::Tanh] {
            for x in [-2.0, -0.3, 0.0, 0.7, 1.5] {
                let numeric = (kind.apply(x + h) - kind.apply(x - h)) / (2.0 * h);
                let analytic = kind.derivative_from_output(kind.apply(x));
                assert_relative_eq!(numeric, analytic, epsilon = 1e-6);
            }
        }
    }
}
