//! Errors reported by table maintenance operations.

use thiserror::Error;

/// The reason a `resize_table` request was refused.
///
/// A refused request leaves the table exactly as it was.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ResizeError {
    /// The requested capacity cannot hold the entries currently in an open addressing table.
    #[error("requested capacity {requested} is smaller than the number of entries {len}")]
    BelowSize {
        /// The capacity that was asked for.
        requested: usize,
        /// The number of live entries at the time of the request.
        len: usize,
    },

    /// A chained table needs at least one bucket.
    #[error("requested capacity must be at least 1")]
    Zero,
}
