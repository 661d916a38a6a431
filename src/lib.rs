//! Enmascarar: masked autoencoder distribution estimation in pure Rust.
//!
//! Enmascarar models the joint distribution of binary vectors as a product
//! of autoregressive conditionals, enforced structurally: the weight
//! matrices of a plain feed-forward network are gated by fixed boolean
//! masks so that each output depends only on strictly-preceding inputs in
//! a chosen ordering (Germain et al., 2015). The mask-generation core is
//! deterministic given its seed; the rest of the crate is the dense
//! network, loss, optimizer, and data plumbing needed to train it on
//! binarized data such as MNIST.
//!
//! # Quick Start
//!
//! ```
//! use enmascarar::prelude::*;
//!
//! // Derive the connectivity masks for a 2-hidden-layer network.
//! let masks = MaskGenerator::new(784, vec![500, 500])
//!     .with_seed(42)
//!     .with_ordering(OrderingMode::Random)
//!     .generate()
//!     .unwrap();
//!
//! // One mask per weight matrix, shaped source × destination.
//! assert_eq!(masks.len(), 3);
//! assert_eq!(masks.mask(0).shape(), (784, 500));
//! assert_eq!(masks.mask(2).shape(), (500, 784));
//!
//! // Identical arguments always reproduce the identical mask set.
//! let again = MaskGenerator::new(784, vec![500, 500])
//!     .with_seed(42)
//!     .with_ordering(OrderingMode::Random)
//!     .generate()
//!     .unwrap();
//! assert_eq!(masks, again);
//! ```
//!
//! # Modules
//!
//! - [`masks`]: Autoregressive connectivity masks (the core)
//! - [`nn`]: Masked layers, the MADE network, loss functions
//! - [`optim`]: Stochastic optimizers (SGD, Adam)
//! - [`data`]: Binary datasets (loading, splitting, batching)
//! - [`train`]: Configuration and the training loop
//! - [`primitives`]: Core Vector and Matrix types
//!
//! # References
//!
//! - Germain, M., Gregor, K., Murray, I., & Larochelle, H. (2015). MADE:
//!   Masked Autoencoder for Distribution Estimation. ICML.

pub mod data;
pub mod error;
pub mod masks;
pub mod nn;
pub mod optim;
pub mod prelude;
pub mod primitives;
pub mod train;

pub use error::{EnmascararError, Result};
pub use masks::{MaskGenerator, MaskSet, OrderingMode};
pub use primitives::{Matrix, Vector};
