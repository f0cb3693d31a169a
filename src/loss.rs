//! Error measures reported while training.

/// `sum 0.5 * (t - o)^2`, the quantity back-propagation minimises.
pub fn half_squared_error(pred: &[f64], target: &[f64]) -> f64 {
    pred.iter()
        .zip(target)
        .map(|(&p, &t)| 0.5 * (t - p).powi(2))
        .sum()
}
