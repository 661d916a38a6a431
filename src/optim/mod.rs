//! Stochastic first-order optimizers.
//!
//! The trainer treats optimization generically: anything that can apply a
//! gradient step to a flat parameter vector. [`Sgd`] and [`Adam`] cover
//! the two recipes actually used; Adam is the default for MADE training.
//!
//! # Example
//!
//! ```
//! use enmascarar::optim::{Adam, Optimizer};
//! use enmascarar::primitives::Vector;
//!
//! let mut optimizer = Adam::new(0.001);
//! let mut params = Vector::from_slice(&[1.0, 2.0]);
//! let gradients = Vector::from_slice(&[0.1, 0.2]);
//! optimizer.step(&mut params, &gradients);
//! assert!(params[0] < 1.0);
//! ```

mod stochastic;

pub use stochastic::{Adam, Sgd};

use crate::primitives::Vector;

/// Incremental gradient-based parameter updates.
pub trait Optimizer {
    /// Applies one update to `params` given `gradients` of equal length.
    fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>);

    /// Clears accumulated state (moments, velocity, step counters).
    fn reset(&mut self);
}
