//! Pointwise non-linearities, scalar and matrix forms.

use crate::primitives::Matrix;

/// Scalar sigmoid: σ(x) = 1 / (1 + exp(-x)).
#[inline]
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Scalar rectified linear unit: max(0, x).
#[inline]
#[must_use]
pub fn relu(x: f32) -> f32 {
    x.max(0.0)
}

/// Element-wise ReLU over a matrix.
#[must_use]
pub fn relu_matrix(m: &Matrix<f32>) -> Matrix<f32> {
    Matrix::from_fn(m.n_rows(), m.n_cols(), |i, j| relu(m.get(i, j)))
}

/// Element-wise sigmoid over a matrix.
#[must_use]
pub fn sigmoid_matrix(m: &Matrix<f32>) -> Matrix<f32> {
    Matrix::from_fn(m.n_rows(), m.n_cols(), |i, j| sigmoid(m.get(i, j)))
}
