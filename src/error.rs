use thiserror::Error;

/// Unified error type for the index layer.
///
/// Lookups never fail: a missing key is `None`, not an error. What remains
/// are configuration mistakes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Options rejected at construction time.
    #[error("invalid index options: {0}")]
    InvalidOptions(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
