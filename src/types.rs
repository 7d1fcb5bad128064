//! Core types for dune-batch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a Dune query
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub u64);

impl QueryId {
    /// Create a new QueryId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for QueryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<QueryId> for u64 {
    fn from(id: QueryId) -> Self {
        id.0
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for QueryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Tabular result of one query fetch: ordered columns, ordered rows of
/// stringified cells, and the capture timestamp used for the output filename.
///
/// Exists only transiently between fetch and write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultTable {
    /// Column names, in the order the API reported them
    pub columns: Vec<String>,
    /// Data rows; each row's cells align positionally with `columns`
    pub rows: Vec<Vec<String>>,
    /// When the result was fetched
    pub captured_at: DateTime<Utc>,
}

impl ResultTable {
    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Report returned by the result writer after persisting one table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteSummary {
    /// Where the CSV landed
    pub path: PathBuf,
    /// Number of data rows written (header excluded)
    pub row_count: usize,
    /// Size of the finished file in bytes
    pub size_bytes: u64,
}

/// Per-identifier outcome of a batch run, accumulated into the final report
#[derive(Clone, Debug)]
pub enum FetchOutcome {
    /// Fetch and write both succeeded
    Written {
        /// The query that was fetched
        id: QueryId,
        /// The writer's report for the produced file
        summary: WriteSummary,
    },
    /// The fetch failed at the transport level (connection, timeout, TLS)
    TransportFailed {
        /// The query whose fetch failed
        id: QueryId,
        /// Rendered error detail
        detail: String,
    },
    /// The fetch or write failed for any other reason
    Failed {
        /// The query whose fetch failed
        id: QueryId,
        /// Rendered error detail
        detail: String,
    },
}

impl FetchOutcome {
    /// The query this outcome belongs to
    pub fn id(&self) -> QueryId {
        match self {
            FetchOutcome::Written { id, .. }
            | FetchOutcome::TransportFailed { id, .. }
            | FetchOutcome::Failed { id, .. } => *id,
        }
    }

    /// True if the identifier produced an output file
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Written { .. })
    }
}
