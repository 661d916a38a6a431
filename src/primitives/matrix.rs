//! Matrix type for 2D numeric data.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Vector;

/// A 2D matrix with row-major storage.
///
/// Weights and activations use `Matrix<f32>`; connectivity masks use
/// `Matrix<bool>` with rows = source units and columns = destination units.
///
/// # Examples
///
/// ```
/// use enmascarar::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2*3 elements");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a matrix from a row-major data vector.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn<F: FnMut(usize, usize) -> T>(rows: usize, cols: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { data, rows, cols }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "Matrix index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.rows && col < self.cols, "Matrix index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    /// Returns a row as a Vector.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> Vector<T> {
        let start = row_idx * self.cols;
        Vector::from_slice(&self.data[start..start + self.cols])
    }

    /// Returns the underlying row-major data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<bool> {
    /// Counts the `true` entries (the allowed connections of a mask).
    #[must_use]
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }
}

impl Matrix<f32> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Returns the transposed matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Matrix multiplication: (m×k) * (k×n) = (m×n).
    ///
    /// Output rows are computed in parallel; within each row the
    /// accumulation order is fixed, so results are reproducible across
    /// thread schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if inner dimensions don't match.
    pub fn matmul(&self, other: &Self) -> Result<Self, &'static str> {
        if self.cols != other.rows {
            return Err("Matrix dimensions incompatible for multiplication");
        }
        let n = other.cols;
        let mut data = vec![0.0f32; self.rows * n];
        data.par_chunks_mut(n).enumerate().for_each(|(i, out_row)| {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                let b_row = &other.data[k * n..(k + 1) * n];
                for (out, &b) in out_row.iter_mut().zip(b_row) {
                    *out += a * b;
                }
            }
        });
        Ok(Self {
            data,
            rows: self.rows,
            cols: n,
        })
    }

    /// Element-wise product of two matrices of identical shape.
    ///
    /// # Errors
    ///
    /// Returns an error if shapes differ.
    pub fn hadamard(&self, other: &Self) -> Result<Self, &'static str> {
        if self.shape() != other.shape() {
            return Err("Matrix shapes must match for element-wise product");
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a * b)
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Element-wise sum of two matrices of identical shape.
    ///
    /// # Errors
    ///
    /// Returns an error if shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self, &'static str> {
        if self.shape() != other.shape() {
            return Err("Matrix shapes must match for addition");
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a + b)
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Element-wise difference of two matrices of identical shape.
    ///
    /// # Errors
    ///
    /// Returns an error if shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self, &'static str> {
        if self.shape() != other.shape() {
            return Err("Matrix shapes must match for subtraction");
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Multiplies every element by a scalar.
    #[must_use]
    pub fn mul_scalar(&self, scalar: f32) -> Self {
        Self {
            data: self.data.iter().map(|&x| x * scalar).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Sums each column, producing a vector of length `n_cols`.
    #[must_use]
    pub fn column_sums(&self) -> Vector<f32> {
        let mut sums = vec![0.0f32; self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                sums[j] += self.data[i * self.cols + j];
            }
        }
        Vector::from_vec(sums)
    }

    /// Sum of squared elements.
    #[must_use]
    pub fn sum_squares(&self) -> f32 {
        self.data.iter().map(|&x| x * x).sum()
    }
}
