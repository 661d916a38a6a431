//! Binary datasets: loading, splitting, batching.
//!
//! Binarized MNIST is distributed as whitespace-separated text ("amat")
//! files, one row of 0/1 values per line; [`BinaryDataset::from_amat`]
//! reads that format. Real-valued data can be thresholded into a dataset
//! with [`BinaryDataset::binarize`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{EnmascararError, Result};
use crate::primitives::Matrix;

/// A set of fixed-dimensionality binary row vectors.
///
/// Every element is exactly 0.0 or 1.0; the invariant is checked at
/// construction so the training loop never has to.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryDataset {
    data: Matrix<f32>,
}

impl BinaryDataset {
    /// Wraps a matrix of 0/1 values.
    ///
    /// # Errors
    ///
    /// [`EnmascararError::InvalidDimension`] for an empty matrix,
    /// [`EnmascararError::FormatError`] if any element is not exactly 0 or 1.
    pub fn from_matrix(data: Matrix<f32>) -> Result<Self> {
        if data.n_rows() == 0 || data.n_cols() == 0 {
            return Err(EnmascararError::InvalidDimension {
                param: "dataset".to_string(),
                value: format!("{}x{}", data.n_rows(), data.n_cols()),
                constraint: "at least one row and one column".to_string(),
            });
        }
        if let Some(bad) = data.as_slice().iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(EnmascararError::FormatError {
                message: format!("non-binary value {bad} in dataset"),
            });
        }
        Ok(Self { data })
    }

    /// Loads a whitespace-separated text file of 0/1 rows.
    ///
    /// Blank lines are skipped; all remaining lines must have the same
    /// number of values.
    ///
    /// # Errors
    ///
    /// [`EnmascararError::Io`] for file errors,
    /// [`EnmascararError::FormatError`] for unparsable or ragged rows,
    /// [`EnmascararError::InvalidDimension`] when no rows are present.
    pub fn from_amat<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut values: Vec<f32> = Vec::new();
        let mut n_rows = 0usize;
        let mut n_cols = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<f32> = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f32>().map_err(|_| EnmascararError::FormatError {
                        message: format!("line {}: unparsable value {tok:?}", line_no + 1),
                    })
                })
                .collect::<Result<_>>()?;
            if n_rows == 0 {
                n_cols = row.len();
            } else if row.len() != n_cols {
                return Err(EnmascararError::FormatError {
                    message: format!(
                        "line {}: expected {n_cols} values, found {}",
                        line_no + 1,
                        row.len()
                    ),
                });
            }
            values.extend_from_slice(&row);
            n_rows += 1;
        }

        if n_rows == 0 {
            return Err(EnmascararError::InvalidDimension {
                param: "dataset".to_string(),
                value: "0 rows".to_string(),
                constraint: "at least one row".to_string(),
            });
        }

        let data = Matrix::from_vec(n_rows, n_cols, values)
            .expect("row count and width are tracked during parsing");
        Self::from_matrix(data)
    }

    /// Thresholds real-valued data into a binary dataset: values
    /// `>= threshold` become 1.0, the rest 0.0.
    ///
    /// # Errors
    ///
    /// [`EnmascararError::InvalidDimension`] for an empty matrix.
    pub fn binarize(data: &Matrix<f32>, threshold: f32) -> Result<Self> {
        let binary = Matrix::from_fn(data.n_rows(), data.n_cols(), |i, j| {
            if data.get(i, j) >= threshold {
                1.0
            } else {
                0.0
            }
        });
        Self::from_matrix(binary)
    }

    /// Seeded shuffled train/test split.
    ///
    /// # Errors
    ///
    /// [`EnmascararError::InvalidHyperparameter`] when `test_size` is not
    /// in (0, 1) or either side of the split would be empty.
    pub fn split(&self, test_size: f32, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(EnmascararError::InvalidHyperparameter {
                param: "test_size".to_string(),
                value: test_size.to_string(),
                constraint: "in (0, 1)".to_string(),
            });
        }
        let n = self.n_samples();
        let n_test = (n as f32 * test_size).round() as usize;
        let n_train = n - n_test;
        if n_test == 0 || n_train == 0 {
            return Err(EnmascararError::InvalidHyperparameter {
                param: "test_size".to_string(),
                value: test_size.to_string(),
                constraint: format!("a non-empty split of {n} samples"),
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train = Self {
            data: self.gather_rows(&indices[..n_train]),
        };
        let test = Self {
            data: self.gather_rows(&indices[n_train..]),
        };
        Ok((train, test))
    }

    /// Builds a batch matrix from the given row indices, in order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn gather_rows(&self, indices: &[usize]) -> Matrix<f32> {
        Matrix::from_fn(indices.len(), self.n_dims(), |i, j| {
            self.data.get(indices[i], j)
        })
    }

    /// Iterates over contiguous batches of up to `batch_size` rows; the
    /// final batch may be short.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = Matrix<f32>> + '_ {
        assert!(batch_size > 0, "batch_size must be positive");
        let n = self.n_samples();
        (0..n).step_by(batch_size).map(move |start| {
            let end = (start + batch_size).min(n);
            let indices: Vec<usize> = (start..end).collect();
            self.gather_rows(&indices)
        })
    }

    /// A seeded random permutation of the row indices, for epoch
    /// shuffling.
    #[must_use]
    pub fn shuffled_indices(&self, rng: &mut StdRng) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.n_samples()).collect();
        indices.shuffle(rng);
        indices
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.data.n_rows()
    }

    /// Dimensionality of each row.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.data.n_cols()
    }

    /// The underlying matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix<f32> {
        &self.data
    }
}
