//! Error taxonomy for the pipeline.
//!
//! Source and signal errors are recoverable per fixture (log, skip,
//! continue). Store errors are fatal for the run: silently losing a write
//! would break the checkpoint and merge invariants the settlement loop
//! depends on.

use thiserror::Error;

/// Failures talking to the fixture/odds source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level failure or timeout; the data may exist, we just
    /// couldn't get it this run.
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The response arrived but did not match the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Failures reading or writing durable state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding: {0}")]
    Encode(#[from] serde_json::Error),
}
