//! Autoregressive connectivity masks.
//!
//! The joint distribution of a binary vector factorizes as a product of
//! per-dimension conditionals once a total order over the dimensions is
//! fixed. A feed-forward network respects that factorization when every
//! computation path from input *i* to output *j* is cut unless dimension
//! *i* strictly precedes dimension *j* in the order. This module derives
//! the boolean weight masks that cut those paths structurally, so a dense
//! network multiplied by them becomes autoregressive without any
//! architectural recurrence.
//!
//! Each hidden unit carries a connectivity label: the highest ordering
//! rank it is allowed to depend on. Input-to-hidden and hidden-to-hidden
//! connections require `label_src <= label_dst`; the final connection into
//! the output layer is strict (`label < rank`), so no output ever sees its
//! own dimension.
//!
//! # Example
//!
//! ```
//! use enmascarar::masks::{MaskGenerator, OrderingMode};
//!
//! let masks = MaskGenerator::new(784, vec![500, 500])
//!     .with_seed(42)
//!     .with_ordering(OrderingMode::Random)
//!     .generate()
//!     .unwrap();
//!
//! assert_eq!(masks.len(), 3);
//! assert_eq!(masks.mask(0).shape(), (784, 500));
//! assert_eq!(masks.mask(1).shape(), (500, 500));
//! assert_eq!(masks.mask(2).shape(), (500, 784));
//! ```
//!
//! # References
//!
//! - Germain, M., Gregor, K., Murray, I., & Larochelle, H. (2015). MADE:
//!   Masked Autoencoder for Distribution Estimation. ICML.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EnmascararError, Result};
use crate::primitives::Matrix;

/// How the autoregressive order over input dimensions is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    /// Identity permutation: dimension i has rank i.
    Natural,
    /// Uniformly random permutation drawn from the generator's seed.
    #[default]
    Random,
}

impl fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingMode::Natural => write!(f, "natural"),
            OrderingMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for OrderingMode {
    type Err = EnmascararError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "natural" => Ok(OrderingMode::Natural),
            "random" => Ok(OrderingMode::Random),
            _ => Err(EnmascararError::InvalidOrderingMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Builds the connectivity masks for one network instance.
///
/// Deterministic: identical `(nin, hidden_sizes, seed, ordering)` always
/// yield bit-identical masks. The generator owns a seeded [`StdRng`]
/// scoped to a single [`generate`](MaskGenerator::generate) call; there is
/// no process-wide random state, so concurrent callers are independent.
///
/// # Example
///
/// ```
/// use enmascarar::masks::{MaskGenerator, OrderingMode};
///
/// let gen = MaskGenerator::new(4, vec![]).with_ordering(OrderingMode::Natural);
/// let masks = gen.generate().unwrap();
///
/// // No hidden layers: a single strict input-to-output mask.
/// assert_eq!(masks.len(), 1);
/// assert_eq!(masks.mask(0).shape(), (4, 4));
/// assert!(masks.mask(0).get(0, 3));
/// assert!(!masks.mask(0).get(3, 0));
/// ```
#[derive(Debug, Clone)]
pub struct MaskGenerator {
    nin: usize,
    hidden_sizes: Vec<usize>,
    seed: u64,
    ordering: OrderingMode,
}

impl MaskGenerator {
    /// Creates a generator for `nin` input dimensions and the given hidden
    /// layer widths. Seed defaults to 0, ordering to random.
    #[must_use]
    pub fn new(nin: usize, hidden_sizes: Vec<usize>) -> Self {
        Self {
            nin,
            hidden_sizes,
            seed: 0,
            ordering: OrderingMode::default(),
        }
    }

    /// Sets the seed for the permutation and label draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the ordering mode.
    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingMode) -> Self {
        self.ordering = ordering;
        self
    }

    /// Generates the full mask set: one mask per weight matrix
    /// (`hidden_sizes.len() + 1` in total).
    ///
    /// # Errors
    ///
    /// Fails with [`EnmascararError::InvalidDimension`] when `nin < 2` or
    /// any hidden width is zero, before consuming any randomness.
    pub fn generate(&self) -> Result<MaskSet> {
        self.validate()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let (ordering, labels) = layer_labels(&mut rng, self.nin, &self.hidden_sizes, self.ordering);

        let mut masks: Vec<Matrix<bool>> = Vec::with_capacity(self.hidden_sizes.len() + 1);
        for l in 1..labels.len() {
            let src = &labels[l - 1];
            let dst = &labels[l];
            masks.push(Matrix::from_fn(src.len(), dst.len(), |i, j| {
                src[i] <= dst[j]
            }));
        }

        // Output connections compare strictly against the ordering itself:
        // the unit predicting dimension j may see strictly-earlier ranks
        // only. With no hidden layers this doubles as the direct
        // input-to-output mask.
        let last = labels.last().expect("labels always contain the ordering");
        masks.push(Matrix::from_fn(last.len(), self.nin, |i, j| {
            last[i] < ordering[j]
        }));

        Ok(MaskSet {
            masks,
            ordering,
            nin: self.nin,
            hidden_sizes: self.hidden_sizes.clone(),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.nin < 2 {
            return Err(EnmascararError::InvalidDimension {
                param: "nin".to_string(),
                value: self.nin.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        for (l, &width) in self.hidden_sizes.iter().enumerate() {
            if width == 0 {
                return Err(EnmascararError::InvalidDimension {
                    param: format!("hidden_sizes[{l}]"),
                    value: width.to_string(),
                    constraint: ">= 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Draws the ordering and every layer's connectivity labels from one RNG
/// stream. Index 0 of the returned labels is the ordering itself; indices
/// 1..=L are the hidden layers.
///
/// In natural mode the permutation draw is skipped but the same stream
/// still feeds the label samples, so labels vary with the seed while the
/// ordering does not.
fn layer_labels(
    rng: &mut StdRng,
    nin: usize,
    hidden_sizes: &[usize],
    mode: OrderingMode,
) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut ordering: Vec<usize> = (0..nin).collect();
    if mode == OrderingMode::Random {
        ordering.shuffle(rng);
    }

    let mut labels: Vec<Vec<usize>> = Vec::with_capacity(hidden_sizes.len() + 1);
    labels.push(ordering.clone());
    for &width in hidden_sizes {
        // Lower bound is the running minimum of the previous layer, upper
        // bound is fixed at nin-2: a unit labeled nin-1 could never feed
        // any output.
        let prev_min = *labels
            .last()
            .expect("labels always contain the ordering")
            .iter()
            .min()
            .expect("layer widths are validated non-zero");
        labels.push(sample_labels(rng, width, prev_min, nin - 2));
    }

    (ordering, labels)
}

/// Samples `width` labels uniformly with replacement from `[low, high]`.
fn sample_labels(rng: &mut StdRng, width: usize, low: usize, high: usize) -> Vec<usize> {
    (0..width).map(|_| rng.gen_range(low..=high)).collect()
}

/// The complete ordered collection of masks for one network instance.
///
/// Generated once per training run and held fixed: the set is immutable
/// and safe to read concurrently, which is what keeps the autoregressive
/// factorization valid for the network's entire lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskSet {
    masks: Vec<Matrix<bool>>,
    ordering: Vec<usize>,
    nin: usize,
    hidden_sizes: Vec<usize>,
}

impl MaskSet {
    /// Number of masks (= number of weight matrices in the network).
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// A mask set always contains at least the output mask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// The mask for weight matrix `layer`, with rows = source units and
    /// columns = destination units.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= len()`.
    #[must_use]
    pub fn mask(&self, layer: usize) -> &Matrix<bool> {
        &self.masks[layer]
    }

    /// All masks in layer order.
    #[must_use]
    pub fn masks(&self) -> &[Matrix<bool>] {
        &self.masks
    }

    /// The autoregressive ordering the set was built from: `ordering[d]`
    /// is the rank of input dimension `d`.
    #[must_use]
    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    /// Input (and output) dimensionality.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.nin
    }

    /// Hidden layer widths the set was built for.
    #[must_use]
    pub fn hidden_sizes(&self) -> &[usize] {
        &self.hidden_sizes
    }

    /// Fraction of allowed connections across all masks. Useful for
    /// reporting how much of the dense capacity survives masking.
    #[must_use]
    pub fn density(&self) -> f32 {
        let allowed: usize = self.masks.iter().map(Matrix::count_true).sum();
        let total: usize = self
            .masks
            .iter()
            .map(|m| m.n_rows() * m.n_cols())
            .sum();
        allowed as f32 / total as f32
    }
}
