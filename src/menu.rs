//! Top-level menu — routes one user choice to the batch fetcher or the
//! CSV extractor.

use crate::batch::BatchFetcher;
use crate::client::ResultFetcher;
use crate::collector::collect_query_ids;
use crate::config::Config;
use crate::error::Result;
use crate::extract::Extractor;
use crate::prompt::Prompt;
use crate::types::FetchOutcome;
use crate::writer::ResultWriter;

const FETCH_LABEL: &str = "Fetch query results in batches";
const PARSE_LABEL: &str = "Parse output CSVs into address lists";

/// Present the two-action menu once and run the chosen flow.
///
/// A cancelled prompt is a quiet no-op exit.
pub async fn run(
    config: &Config,
    fetcher: &dyn ResultFetcher,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let options = vec![FETCH_LABEL.to_string(), PARSE_LABEL.to_string()];

    match prompt.choose("What would you like to do?", &options)? {
        Some(0) => {
            let ids = collect_query_ids(prompt)?;
            let writer = ResultWriter::new(&config.output_dir);
            let outcomes = BatchFetcher::new(fetcher, &writer, &config.batch)
                .run(&ids)
                .await;
            report_outcomes(prompt, &outcomes)?;
        }
        Some(1) => {
            Extractor::new(&config.output_dir, &config.parsed_dir, config.extract.clone())
                .run(prompt)?;
        }
        _ => {
            tracing::debug!("Menu cancelled, exiting");
        }
    }

    Ok(())
}

/// Show the per-query report and the overall completion line.
fn report_outcomes(prompt: &mut dyn Prompt, outcomes: &[FetchOutcome]) -> Result<()> {
    if outcomes.is_empty() {
        prompt.say("No query IDs entered, nothing to do.")?;
        return Ok(());
    }

    for outcome in outcomes {
        match outcome {
            FetchOutcome::Written { id, summary } => prompt.say(&format!(
                "Query {id}: {} rows, {} bytes -> {}",
                summary.row_count,
                summary.size_bytes,
                summary.path.display()
            ))?,
            FetchOutcome::TransportFailed { id, detail } => {
                prompt.say(&format!("Query {id}: network failure - {detail}"))?;
            }
            FetchOutcome::Failed { id, detail } => {
                prompt.say(&format!("Query {id}: failed - {detail}"))?;
            }
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    prompt.say(&format!(
        "Batch complete: {succeeded}/{} queries written.",
        outcomes.len()
    ))?;
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::prompt::LinePrompt;
    use crate::types::{QueryId, ResultTable};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    struct StubFetcher {
        fail: bool,
    }

    #[async_trait]
    impl ResultFetcher for StubFetcher {
        async fn fetch(&self, id: QueryId) -> crate::error::Result<ResultTable> {
            if self.fail {
                return Err(Error::Api {
                    query_id: id,
                    status: 404,
                    message: "query not found".into(),
                });
            }
            Ok(ResultTable {
                columns: vec!["token_address".into()],
                rows: vec![vec!["0xabc".into()]],
                captured_at: Utc::now(),
            })
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::new("test-key");
        config.output_dir = dir.path().join("out");
        config.parsed_dir = dir.path().join("parsed");
        config.batch.pause_between_groups = Duration::from_millis(1);
        config
    }

    fn prompt(input: &str) -> LinePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn fetch_route_with_no_ids_reports_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let fetcher = StubFetcher { fail: false };

        // option 1 = fetch, then an immediate empty line ends collection
        let mut p = prompt("1\n\n");
        run(&config, &fetcher, &mut p).await.unwrap();

        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("No query IDs entered, nothing to do."));
    }

    #[tokio::test]
    async fn fetch_route_writes_and_reports_summary() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let fetcher = StubFetcher { fail: false };

        let mut p = prompt("1\n42\n\n");
        run(&config, &fetcher, &mut p).await.unwrap();

        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("Query 42: 1 rows"));
        assert!(shown.contains("Batch complete: 1/1 queries written."));
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn fetch_route_reports_failures_distinguishably() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let fetcher = StubFetcher { fail: true };

        let mut p = prompt("1\n42\n\n");
        run(&config, &fetcher, &mut p).await.unwrap();

        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("Query 42: failed - "));
        assert!(shown.contains("Batch complete: 0/1 queries written."));
    }

    #[tokio::test]
    async fn parse_route_reaches_the_extractor() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let fetcher = StubFetcher { fail: false };

        // option 2 = parse; output dir is empty so the loop reports and exits
        let mut p = prompt("2\n");
        run(&config, &fetcher, &mut p).await.unwrap();

        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("No CSV files found"));
    }

    #[tokio::test]
    async fn cancelled_menu_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let fetcher = StubFetcher { fail: false };

        let mut p = prompt("\n");
        run(&config, &fetcher, &mut p).await.unwrap();

        assert!(!dir.path().join("out").exists());
    }
}
