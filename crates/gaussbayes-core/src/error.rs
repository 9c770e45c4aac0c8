// =============================================================================
// Error Types
// =============================================================================
//
// Every fallible operation in the library returns `Result<T>`, which is
// `std::result::Result<T, GaussBayesError>`.
//
// WHEN EACH ERROR FIRES:
// ----------------------
//   - DimensionMismatch:  R, d, precisions or a parent matrix disagree on the
//                         variable dimension (construction), or a parent value
//                         has the wrong length (solve)
//   - NotSquare:          R is not a square matrix
//   - MissingParentValue: the assignment handed to `solve` has no value for
//                         one of the node's parents
//   - SingularSystem:     a pivot on R's diagonal is zero or within the
//                         configured tolerance of zero
//   - UnknownVariable:    a Bayes network was asked for a key it does not hold
//   - Codec:              a serialized payload could not be read back
//
// None of these are retried internally. They are reported to the caller as-is.
//
// =============================================================================

use thiserror::Error;

/// Errors produced by conditional construction, solving and decoding.
#[derive(Debug, Error)]
pub enum GaussBayesError {
    /// Two pieces of the same system disagree on a dimension.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The triangular factor must be square.
    #[error("R must be square, got {rows}x{cols}")]
    NotSquare {
        /// Row count of the offending matrix
        rows: usize,
        /// Column count of the offending matrix
        cols: usize,
    },

    /// The assignment does not hold a value for a required variable.
    #[error("No value for variable '{key}' in assignment")]
    MissingParentValue {
        /// Key that was looked up
        key: String,
    },

    /// Back-substitution hit a pivot that is (numerically) zero.
    #[error("Singular system: pivot R[{row},{row}] = {pivot:e} is within tolerance {tolerance:e}")]
    SingularSystem {
        /// Diagonal index of the failing pivot
        row: usize,
        /// Value of the failing pivot
        pivot: f64,
        /// Tolerance the pivot was compared against
        tolerance: f64,
    },

    /// A Bayes network lookup named a variable that is not in the network.
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// Encoding or decoding failed.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl GaussBayesError {
    /// Create a MissingParentValue error.
    pub fn missing_parent_value(key: impl Into<String>) -> Self {
        Self::MissingParentValue { key: key.into() }
    }

    /// Create a DimensionMismatch error from a formatted description.
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch(message.into())
    }
}

impl From<serde_json::Error> for GaussBayesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaussBayesError>;
