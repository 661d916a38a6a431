//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use enmascarar::prelude::*;
//! ```

pub use crate::data::BinaryDataset;
pub use crate::error::{EnmascararError, Result};
pub use crate::masks::{MaskGenerator, MaskSet, OrderingMode};
pub use crate::nn::{BCEWithLogitsLoss, Made, MaskedLinear, Reduction};
pub use crate::optim::{Adam, Optimizer, Sgd};
pub use crate::primitives::{Matrix, Vector};
pub use crate::train::{TrainConfig, TrainReport, Trainer};
