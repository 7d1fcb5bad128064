//! Result persistence — one CSV file per fetched table.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{QueryId, ResultTable, WriteSummary};

/// Filename prefix for fetched results
const OUTPUT_PREFIX: &str = "dune_output";

/// Second-resolution stamp embedded in output filenames
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes fetched tables into the output directory.
///
/// Filenames are `dune_output_{query_id}_{timestamp}.csv`; the second-level
/// timestamp plus sequential fetching keeps names unique within a run. A name
/// collision overwrites.
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    /// Target the given output directory (created on first write)
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The directory this writer persists into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Persist one table: header row of column names, then data rows, no
    /// index column. Returns the path plus row count and byte size for
    /// reporting.
    pub fn write(&self, id: QueryId, table: &ResultTable) -> Result<WriteSummary> {
        std::fs::create_dir_all(&self.output_dir)?;

        let filename = format!(
            "{OUTPUT_PREFIX}_{id}_{}.csv",
            table.captured_at.format(TIMESTAMP_FORMAT)
        );
        let path = self.output_dir.join(filename);

        let mut writer = csv::Writer::from_path(&path)?;
        if !table.columns.is_empty() {
            writer.write_record(&table.columns)?;
        }
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        drop(writer);

        let size_bytes = std::fs::metadata(&path)?.len();
        let summary = WriteSummary {
            path,
            row_count: table.row_count(),
            size_bytes,
        };

        tracing::info!(
            query_id = id.0,
            path = %summary.path.display(),
            rows = summary.row_count,
            bytes = summary.size_bytes,
            "Wrote query result"
        );

        Ok(summary)
    }
}
