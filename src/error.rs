//! Error types for network construction, evaluation, and weight import.

use thiserror::Error;

/// Everything that can go wrong inside the network core.
///
/// All of these except [`NetworkError::ConstructionError`] are recoverable:
/// the operation rejects its arguments, leaves the network untouched, and the
/// host is expected to skip the step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// An input or desired-output vector had the wrong length for this
    /// topology.
    #[error("input size mismatch: expected {expected} values, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },

    /// A weight import carried a different number of values than the network
    /// holds. Weight strings are only valid for the exact topology they were
    /// exported from.
    #[error("weight count mismatch: network has {expected} weights, got {actual} values")]
    WeightCountMismatch { expected: usize, actual: usize },

    /// A weight token failed to parse as a real number. The import is
    /// abandoned without touching any existing weight.
    #[error("invalid weight value {token:?} at position {position}")]
    ParseError { token: String, position: usize },

    /// The requested topology is not constructible (a zero where a positive
    /// count is required).
    #[error("invalid topology: {message}")]
    ConstructionError { message: String },
}
