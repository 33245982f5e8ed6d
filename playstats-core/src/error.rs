//! Error types for playstats-core

use thiserror::Error;

/// Main error type for the playstats-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// History payload had the wrong shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),

    /// No song playback survived classification and normalization.
    ///
    /// Carries the provenance counters so callers can explain why.
    #[error(
        "no usable song records: read {total_records_read}, \
         {ignored_non_song} non-song, {ignored_bad_timestamp} bad timestamp"
    )]
    NoUsableRecords {
        total_records_read: u64,
        ignored_non_song: u64,
        ignored_bad_timestamp: u64,
    },
}

/// Result type alias for playstats-core
pub type Result<T> = std::result::Result<T, Error>;
