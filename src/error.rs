//! Error types for Enmascarar operations.
//!
//! Mask generation is a pure deterministic computation: every failure here
//! is a programming or configuration error surfaced to the caller before
//! any work is done, never silently corrected.

use std::fmt;

/// Main error type for Enmascarar operations.
///
/// # Examples
///
/// ```
/// use enmascarar::error::EnmascararError;
///
/// let err = EnmascararError::InvalidDimension {
///     param: "nin".to_string(),
///     value: "1".to_string(),
///     constraint: ">= 2".to_string(),
/// };
/// assert!(err.to_string().contains("Invalid dimension"));
/// ```
#[derive(Debug)]
pub enum EnmascararError {
    /// A layer width or input dimensionality is out of range
    /// (nin < 2, a zero-width hidden layer, an empty dataset).
    InvalidDimension {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// An unrecognized autoregressive ordering mode was supplied.
    /// Only "natural" and "random" are valid.
    InvalidOrderingMode {
        /// The rejected mode string
        mode: String,
    },

    /// Invalid training hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Matrix/mask/batch dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Training produced a non-finite loss.
    ConvergenceFailure {
        /// Epoch at which the loss degenerated
        epoch: usize,
        /// The offending loss value
        loss: f32,
    },

    /// I/O error while loading a dataset.
    Io(std::io::Error),

    /// Dataset contents could not be parsed or are not binary.
    FormatError {
        /// Error description
        message: String,
    },
}

impl fmt::Display for EnmascararError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnmascararError::InvalidDimension {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid dimension: {param} = {value}, expected {constraint}"
                )
            }
            EnmascararError::InvalidOrderingMode { mode } => {
                write!(
                    f,
                    "Invalid ordering mode: {mode:?}, expected \"natural\" or \"random\""
                )
            }
            EnmascararError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            EnmascararError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            EnmascararError::ConvergenceFailure { epoch, loss } => {
                write!(f, "Non-finite loss at epoch {epoch}: {loss}")
            }
            EnmascararError::Io(e) => write!(f, "I/O error: {e}"),
            EnmascararError::FormatError { message } => {
                write!(f, "Invalid dataset format: {message}")
            }
        }
    }
}

impl std::error::Error for EnmascararError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnmascararError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnmascararError {
    fn from(err: std::io::Error) -> Self {
        EnmascararError::Io(err)
    }
}

/// Convenience result type for Enmascarar operations.
pub type Result<T> = std::result::Result<T, EnmascararError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_dimension() {
        let err = EnmascararError::InvalidDimension {
            param: "hidden_sizes[0]".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hidden_sizes[0]"));
        assert!(msg.contains(">= 1"));
    }

    #[test]
    fn test_display_invalid_ordering_mode() {
        let err = EnmascararError::InvalidOrderingMode {
            mode: "sorted".to_string(),
        };
        assert!(err.to_string().contains("sorted"));
        assert!(err.to_string().contains("natural"));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = EnmascararError::from(io);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_non_io_has_no_source() {
        use std::error::Error;
        let err = EnmascararError::FormatError {
            message: "ragged row".to_string(),
        };
        assert!(err.source().is_none());
    }
}
