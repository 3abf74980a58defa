//! Error types for the B-tree index.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the index.
///
/// A missing key is deliberately absent from this list: lookups report
/// absence through `Option`/`bool`, not through `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Node storage could not be obtained.
    ///
    /// The operation that hit this error has been aborted and the tree is
    /// exactly as it was before the call.
    #[error("Allocation failed while requesting {requested} node(s)")]
    AllocationFailure { requested: usize },

    /// The minimum degree must be at least 2 and at most `usize::MAX / 2`.
    #[error("Invalid minimum degree {0}: must be >= 2 and <= usize::MAX / 2")]
    InvalidMinDegree(usize),

    /// A configuration value is out of range or unparsable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A structural check found the tree in an inconsistent state.
    ///
    /// This indicates a bug in the index itself.
    #[error("B-tree invariant violated: {0}")]
    InvariantViolation(String),
}
