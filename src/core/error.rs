//! Error types for the terrain engine

use thiserror::Error;

/// Main error type for the engine
///
/// Out-of-range grid access and probe misses are ordinary outcomes and never
/// surface here; only construction, resizing and configuration can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
