//! Fully connected layer gated by a connectivity mask.

use rand::rngs::StdRng;

use super::init::kaiming_uniform;
use crate::error::{EnmascararError, Result};
use crate::primitives::{Matrix, Vector};

/// A dense layer whose effective weight is the element-wise product of the
/// trainable weight and a fixed boolean mask.
///
/// The weight follows the usual `[out_features × in_features]` convention;
/// the mask arrives from the generator with rows = source units and
/// columns = destination units (`[in_features × out_features]`). This
/// layer owns the transpose between the two conventions: entry
/// `weight[o][i]` survives only where `mask[i][o]` allows the connection.
///
/// The mask is taken by value at construction and never changes for the
/// layer's lifetime.
#[derive(Debug)]
pub struct MaskedLinear {
    /// Trainable weight, shape `[out_features × in_features]`.
    weight: Matrix<f32>,
    /// Trainable bias, length `out_features`.
    bias: Vector<f32>,
    /// Connectivity mask, shape `[in_features × out_features]`.
    mask: Matrix<bool>,
    in_features: usize,
    out_features: usize,
}

impl MaskedLinear {
    /// Creates a masked layer with Kaiming-initialized weights and zero
    /// bias, drawn from the caller's RNG.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] when the mask shape
    /// is not `(in_features, out_features)`.
    pub fn new(
        in_features: usize,
        out_features: usize,
        mask: Matrix<bool>,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if mask.shape() != (in_features, out_features) {
            return Err(EnmascararError::DimensionMismatch {
                expected: format!("{in_features}x{out_features} mask"),
                actual: format!("{}x{}", mask.n_rows(), mask.n_cols()),
            });
        }
        let weight = kaiming_uniform(out_features, in_features, in_features, rng);
        let bias = Vector::zeros(out_features);
        Ok(Self {
            weight,
            bias,
            mask,
            in_features,
            out_features,
        })
    }

    /// The masked weight actually used in products:
    /// `weight[o][i] * mask[i][o]`, shape `[out_features × in_features]`.
    #[must_use]
    pub fn effective_weight(&self) -> Matrix<f32> {
        Matrix::from_fn(self.out_features, self.in_features, |o, i| {
            if self.mask.get(i, o) {
                self.weight.get(o, i)
            } else {
                0.0
            }
        })
    }

    /// Applies the masked affine transform: `x · (W ⊙ maskᵀ)ᵀ + b`.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] when the input width
    /// is not `in_features`.
    pub fn forward(&self, input: &Matrix<f32>) -> Result<Matrix<f32>> {
        if input.n_cols() != self.in_features {
            return Err(EnmascararError::DimensionMismatch {
                expected: format!("input with {} columns", self.in_features),
                actual: format!("{} columns", input.n_cols()),
            });
        }
        let eff_t = self.effective_weight().transpose();
        let mut out = input
            .matmul(&eff_t)
            .expect("input width checked against in_features");
        for b in 0..out.n_rows() {
            for o in 0..out.n_cols() {
                let v = out.get(b, o) + self.bias[o];
                out.set(b, o, v);
            }
        }
        Ok(out)
    }

    /// Number of input features.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Number of output features.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// The fixed connectivity mask (`[in_features × out_features]`).
    #[must_use]
    pub fn mask(&self) -> &Matrix<bool> {
        &self.mask
    }

    /// The raw (unmasked) trainable weight.
    #[must_use]
    pub fn weight(&self) -> &Matrix<f32> {
        &self.weight
    }

    /// The trainable bias.
    #[must_use]
    pub fn bias(&self) -> &Vector<f32> {
        &self.bias
    }

    /// Trainable parameter count: weight entries plus biases.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.out_features * self.in_features + self.out_features
    }

    /// Appends this layer's parameters (weight row-major, then bias) to a
    /// flat buffer.
    pub(crate) fn params_into(&self, buf: &mut Vec<f32>) {
        buf.extend_from_slice(self.weight.as_slice());
        buf.extend_from_slice(self.bias.as_slice());
    }

    /// Loads this layer's parameters from a flat buffer starting at
    /// `offset`; returns the offset past this layer's block.
    pub(crate) fn load_params(&mut self, buf: &[f32], mut offset: usize) -> usize {
        for o in 0..self.out_features {
            for i in 0..self.in_features {
                self.weight.set(o, i, buf[offset]);
                offset += 1;
            }
        }
        for o in 0..self.out_features {
            self.bias[o] = buf[offset];
            offset += 1;
        }
        offset
    }
}
