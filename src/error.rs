//! Error types for dune-batch
//!
//! The taxonomy mirrors how failures are reported to the user:
//! - transport failures (HTTP-level) and API failures (endpoint-level) are
//!   reported per query without aborting the batch
//! - CSV/IO failures during extraction are reported per file without
//!   aborting the parser loop
//! - configuration errors name the offending key and are fatal at startup

use crate::types::QueryId;
use thiserror::Error;

/// Result type alias for dune-batch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dune-batch
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "DUNE_API_KEY")
        key: Option<String>,
    },

    /// Transport-level failure talking to the Dune API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The Dune API answered, but not with a usable result
    #[error("Dune API error for query {query_id} (HTTP {status}): {message}")]
    Api {
        /// The query whose fetch failed
        query_id: QueryId,
        /// HTTP status code the API returned
        status: u16,
        /// Error detail from the response body, or the raw body text
        message: String,
    },

    /// CSV read or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reading from or writing to the interactive prompt
    #[error("prompt error: {0}")]
    Prompt(String),
}

impl Error {
    /// Returns true if the error happened at the transport level (connection,
    /// timeout, TLS) rather than in the API's answer or local processing.
    ///
    /// Batch reporting distinguishes the two classes: a transport failure
    /// suggests connectivity or rate-limit trouble, anything else points at
    /// the query itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
