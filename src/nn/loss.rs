//! Training criterion: binary cross-entropy on logits plus L2 weight
//! penalty.

use serde::{Deserialize, Serialize};

use super::functional::sigmoid;
use crate::primitives::Matrix;

/// How per-element losses are reduced to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reduction {
    /// Mean over all elements (batch × dimensions).
    #[default]
    Mean,
    /// Plain sum over all elements.
    Sum,
}

/// Binary cross-entropy with logits.
///
/// Combines sigmoid and binary cross-entropy in the numerically stable
/// form, so callers pass raw logits:
///
/// ```text
/// loss = -[y * log(σ(x)) + (1-y) * log(1-σ(x))]
///      = max(x, 0) - x*y + log(1 + exp(-|x|))
/// ```
///
/// # Example
///
/// ```
/// use enmascarar::nn::BCEWithLogitsLoss;
/// use enmascarar::primitives::Matrix;
///
/// let criterion = BCEWithLogitsLoss::new();
/// let logits = Matrix::from_vec(1, 2, vec![10.0, -10.0]).unwrap();
/// let targets = Matrix::from_vec(1, 2, vec![1.0, 0.0]).unwrap();
/// // Confident, correct predictions: loss close to zero.
/// assert!(criterion.forward(&logits, &targets) < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BCEWithLogitsLoss {
    reduction: Reduction,
}

impl BCEWithLogitsLoss {
    /// Criterion with mean reduction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Criterion with an explicit reduction.
    #[must_use]
    pub fn with_reduction(reduction: Reduction) -> Self {
        Self { reduction }
    }

    /// Computes the reduced loss from logits and binary targets.
    ///
    /// # Panics
    ///
    /// Panics if shapes differ.
    #[must_use]
    pub fn forward(&self, logits: &Matrix<f32>, targets: &Matrix<f32>) -> f32 {
        assert_eq!(
            logits.shape(),
            targets.shape(),
            "Logits and targets must have same shape"
        );
        let total: f32 = logits
            .as_slice()
            .iter()
            .zip(targets.as_slice().iter())
            .map(|(&x, &y)| x.max(0.0) - x * y + (1.0 + (-x.abs()).exp()).ln())
            .sum();
        match self.reduction {
            Reduction::Mean => total / logits.as_slice().len() as f32,
            Reduction::Sum => total,
        }
    }

    /// Gradient of the reduced loss with respect to the logits:
    /// `(σ(x) - y)`, scaled by `1/N` for mean reduction.
    ///
    /// # Panics
    ///
    /// Panics if shapes differ.
    #[must_use]
    pub fn grad(&self, logits: &Matrix<f32>, targets: &Matrix<f32>) -> Matrix<f32> {
        assert_eq!(
            logits.shape(),
            targets.shape(),
            "Logits and targets must have same shape"
        );
        let scale = match self.reduction {
            Reduction::Mean => 1.0 / logits.as_slice().len() as f32,
            Reduction::Sum => 1.0,
        };
        Matrix::from_fn(logits.n_rows(), logits.n_cols(), |i, j| {
            (sigmoid(logits.get(i, j)) - targets.get(i, j)) * scale
        })
    }
}

/// L2 penalty over weight matrices: `0.5 * coeff * Σ w²`. Biases are not
/// penalized. The matching gradient contribution is `coeff * w`.
#[must_use]
pub fn l2_penalty(coeff: f32, weights: &[&Matrix<f32>]) -> f32 {
    0.5 * coeff * weights.iter().map(|w| w.sum_squares()).sum::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bce_confident_correct() {
        let logits = Matrix::from_vec(1, 2, vec![10.0_f32, -10.0]).expect("valid");
        let targets = Matrix::from_vec(1, 2, vec![1.0_f32, 0.0]).expect("valid");
        let criterion = BCEWithLogitsLoss::new();
        assert!(criterion.forward(&logits, &targets) < 1e-3);
    }

    #[test]
    fn test_bce_confident_wrong() {
        let logits = Matrix::from_vec(1, 1, vec![10.0_f32]).expect("valid");
        let targets = Matrix::from_vec(1, 1, vec![0.0_f32]).expect("valid");
        let criterion = BCEWithLogitsLoss::new();
        // -log(1 - sigmoid(10)) ≈ 10
        assert!(criterion.forward(&logits, &targets) > 9.0);
    }

    #[test]
    fn test_bce_at_zero_logit() {
        let logits = Matrix::from_vec(1, 1, vec![0.0_f32]).expect("valid");
        let targets = Matrix::from_vec(1, 1, vec![1.0_f32]).expect("valid");
        let criterion = BCEWithLogitsLoss::new();
        // -log(0.5) = ln 2
        assert!((criterion.forward(&logits, &targets) - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn test_sum_reduction_scales_with_elements() {
        let logits = Matrix::from_vec(2, 2, vec![0.0_f32; 4]).expect("valid");
        let targets = Matrix::from_vec(2, 2, vec![1.0_f32, 0.0, 1.0, 0.0]).expect("valid");
        let mean = BCEWithLogitsLoss::new().forward(&logits, &targets);
        let sum = BCEWithLogitsLoss::with_reduction(Reduction::Sum).forward(&logits, &targets);
        assert!((sum - 4.0 * mean).abs() < 1e-5);
    }

    #[test]
    fn test_grad_sign_and_scale() {
        let logits = Matrix::from_vec(1, 2, vec![0.0_f32, 0.0]).expect("valid");
        let targets = Matrix::from_vec(1, 2, vec![1.0_f32, 0.0]).expect("valid");
        let g = BCEWithLogitsLoss::new().grad(&logits, &targets);
        // (sigmoid(0) - 1) / 2 = -0.25 and (sigmoid(0) - 0) / 2 = 0.25
        assert!((g.get(0, 0) + 0.25).abs() < 1e-6);
        assert!((g.get(0, 1) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_l2_penalty() {
        let w = Matrix::from_vec(1, 3, vec![1.0_f32, 2.0, 2.0]).expect("valid");
        assert!((l2_penalty(0.1, &[&w]) - 0.45).abs() < 1e-6);
        assert_eq!(l2_penalty(0.0, &[&w]), 0.0);
    }
}
