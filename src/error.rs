//! Error types for cubature operations.

use std::fmt;

/// Result type for cubature operations.
pub type Result<T> = std::result::Result<T, CubatureError>;

/// Errors that can occur while constructing rules or estimating integrals.
#[derive(Debug, Clone)]
pub enum CubatureError {
    /// Invalid parameter value at rule or driver construction.
    InvalidParameter { parameter: String, message: String },

    /// Integration bounds violate `a[i] <= b[i]` on some axis.
    InvalidInterval { axis: usize, a: f64, b: f64 },

    /// The rule's spatial dimension does not match the integration bounds.
    DimensionMismatch {
        rule_ndim: usize,
        a_ndim: usize,
        b_ndim: usize,
    },

    /// The integrand returned a tensor with an unexpected shape.
    InvalidInput { context: String },

    /// The rule has no lower-order companion and cannot estimate error.
    ///
    /// This is a distinct condition so callers (and the adaptive driver)
    /// can tell a missing capability apart from a failed evaluation.
    ErrorEstimateUnsupported,

    /// A rule was used in a context that requires a capability it lacks.
    InvalidRule { message: String },

    /// Error from an underlying numr operation.
    NumrError(String),
}

impl fmt::Display for CubatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { parameter, message } => {
                write!(f, "Invalid parameter '{}': {}", parameter, message)
            }
            Self::InvalidInterval { axis, a, b } => {
                write!(
                    f,
                    "Invalid interval [{}, {}] on axis {}: bounds must satisfy a <= b",
                    a, b, axis
                )
            }
            Self::DimensionMismatch {
                rule_ndim,
                a_ndim,
                b_ndim,
            } => {
                write!(
                    f,
                    "cubature rule and bounds are of incompatible dimension: nodes have ndim {}, \
                     while limits of integration have ndim a_ndim={}, b_ndim={}",
                    rule_ndim, a_ndim, b_ndim
                )
            }
            Self::InvalidInput { context } => {
                write!(f, "Invalid input: {}", context)
            }
            Self::ErrorEstimateUnsupported => {
                write!(f, "this cubature rule does not implement error estimation")
            }
            Self::InvalidRule { message } => {
                write!(f, "Invalid rule: {}", message)
            }
            Self::NumrError(msg) => {
                write!(f, "numr error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CubatureError {}

impl From<numr::error::Error> for CubatureError {
    fn from(err: numr::error::Error) -> Self {
        Self::NumrError(err.to_string())
    }
}
