//! Weight initialization.
//!
//! Hidden layers use ReLU, so weights are drawn with Kaiming/He bounds
//! (He et al., 2015). Every function takes a caller-owned RNG: there is
//! no process-wide random state anywhere in the crate.

use rand::rngs::StdRng;
use rand::Rng;

use crate::primitives::Matrix;

/// Kaiming uniform initialization (He et al., 2015).
///
/// Samples a `rows × cols` weight matrix from U(-bound, bound) with
/// bound = sqrt(6 / `fan_in`). Optimal for `ReLU` activations.
#[must_use]
pub fn kaiming_uniform(rows: usize, cols: usize, fan_in: usize, rng: &mut StdRng) -> Matrix<f32> {
    let bound = (6.0 / fan_in as f32).sqrt();
    uniform(rows, cols, -bound, bound, rng)
}

/// Uniform initialization: samples every element from U(low, high).
pub(crate) fn uniform(
    rows: usize,
    cols: usize,
    low: f32,
    high: f32,
    rng: &mut StdRng,
) -> Matrix<f32> {
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(low..high))
}
