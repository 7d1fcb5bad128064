//! # dune-batch
//!
//! Batched Dune Analytics result fetcher with CSV post-processing.
//!
//! The crate fetches stored query results from the Dune API in paced groups,
//! persists each result as a CSV file, and can extract one column of an
//! output file into a comma-terminated address list. Everything runs
//! strictly sequentially; the only suspension point is the fixed pause
//! between fetch groups, which exists to stay under the API's rate limits.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dune_batch::{BatchFetcher, Config, DuneClient, QueryId, ResultWriter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("my-api-key");
//!     let client = DuneClient::new(&config.api)?;
//!     let writer = ResultWriter::new(&config.output_dir);
//!
//!     let fetcher = BatchFetcher::new(&client, &writer, &config.batch);
//!     let report = fetcher.run(&[QueryId::new(3412057)]).await;
//!     for outcome in report {
//!         println!("{:?}", outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Batched fetch pipeline with pacing and failure isolation
pub mod batch;
/// Dune API client and the fetch capability trait
pub mod client;
/// Query-identifier collection from user input
pub mod collector;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// CSV column extraction
pub mod extract;
/// Top-level menu routing
pub mod menu;
/// Interactive prompt abstraction
pub mod prompt;
/// Core types
pub mod types;
/// CSV result persistence
pub mod writer;

// Re-export commonly used types
pub use batch::BatchFetcher;
pub use client::{DuneClient, ResultFetcher};
pub use collector::collect_query_ids;
pub use config::{ApiConfig, BatchConfig, Config, ExtractConfig};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use prompt::{LinePrompt, Prompt, StdinPrompt};
pub use types::{FetchOutcome, QueryId, ResultTable, WriteSummary};
pub use writer::ResultWriter;
