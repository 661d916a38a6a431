//! Masked network building blocks.
//!
//! The network side of the crate: a dense layer whose weight matrix is
//! gated by a connectivity mask before every product ([`MaskedLinear`]),
//! the full autoencoder assembled from a [`MaskSet`](crate::masks::MaskSet)
//! ([`Made`]), the training criterion ([`loss`]), and seeded weight
//! initialization ([`init`]).
//!
//! Gradients are derived by hand for this fixed layer stack; there is no
//! autodiff machinery. [`Made::loss_and_grad`] runs the forward pass with
//! cached activations and backpropagates through the same masks used in
//! the forward pass, so masked-out weights receive no data gradient.
//!
//! # References
//!
//! - Germain, M., Gregor, K., Murray, I., & Larochelle, H. (2015). MADE:
//!   Masked Autoencoder for Distribution Estimation. ICML.
//! - He, K., et al. (2015). Delving deep into rectifiers. ICCV.

pub mod functional;
pub mod init;
pub mod loss;
mod made;
mod masked_linear;

pub use loss::{BCEWithLogitsLoss, Reduction};
pub use made::Made;
pub use masked_linear::MaskedLinear;
