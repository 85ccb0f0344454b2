//! FILENAME: pivot-engine/src/error.rs

use thiserror::Error;

/// Terminal failures of one pivot build. Never retried, never logged here;
/// a failed build produces no table rather than a malformed grid.
#[derive(Error, Debug)]
pub enum PivotError {
    /// The requested shape cannot be derived from the given result
    /// (no measures, ragged tree, measures on no axis).
    #[error("unsupported data: {0}")]
    UnsupportedData(String),

    /// The request itself is malformed (unknown dimension key,
    /// mis-assigned @values, overlapping axes).
    #[error("invalid pivot specification: {0}")]
    InvalidSpecification(String),
}
