//! Error types raised by the catalog, storage and configuration layers.
use thiserror::Error;

use crate::constants::LEVEL_COUNT;

/// Errors raised when looking up level definitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    #[error("level {index} is outside the catalog range 1..={max}", max = LEVEL_COUNT)]
    OutOfRange { index: u32 },
}

/// Raised when an input names a waste category that does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown waste category: {0}")]
pub struct UnknownCategory(pub String);

/// Errors surfaced by snapshot persistence back-ends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot storage unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors raised while loading game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
