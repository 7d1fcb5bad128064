//! Batched fetch pipeline — grouping, rate-limit pacing, and per-query
//! failure isolation.
//!
//! Queries are fetched strictly sequentially in input order. Grouping exists
//! only for pacing: after each full group of [`BatchConfig::group_size`]
//! fetches the pipeline sleeps [`BatchConfig::pause_between_groups`], except
//! after the final group. A failed fetch is recorded and reported but never
//! aborts the batch, skips a later query, or triggers a retry.

use crate::client::ResultFetcher;
use crate::config::BatchConfig;
use crate::types::{FetchOutcome, QueryId};
use crate::writer::ResultWriter;

/// Runs query lists through a [`ResultFetcher`] and hands successes to a
/// [`ResultWriter`].
pub struct BatchFetcher<'a> {
    fetcher: &'a dyn ResultFetcher,
    writer: &'a ResultWriter,
    config: &'a BatchConfig,
}

impl<'a> BatchFetcher<'a> {
    /// Wire the pipeline up to its fetch capability, writer, and pacing config
    pub fn new(
        fetcher: &'a dyn ResultFetcher,
        writer: &'a ResultWriter,
        config: &'a BatchConfig,
    ) -> Self {
        Self {
            fetcher,
            writer,
            config,
        }
    }

    /// Fetch every query in order and return one outcome per query.
    ///
    /// An empty input list is a no-op, not an error. The returned report has
    /// exactly `ids.len()` entries, in input order.
    pub async fn run(&self, ids: &[QueryId]) -> Vec<FetchOutcome> {
        if ids.is_empty() {
            tracing::info!("No query IDs to fetch, nothing to do");
            return Vec::new();
        }

        let group_size = self.config.group_size.max(1);
        let group_count = ids.len().div_ceil(group_size);
        tracing::info!(
            queries = ids.len(),
            groups = group_count,
            group_size,
            "Starting batched fetch"
        );

        let mut outcomes = Vec::with_capacity(ids.len());

        for (group_index, group) in ids.chunks(group_size).enumerate() {
            for &id in group {
                outcomes.push(self.fetch_one(id).await);
            }

            let groups_remain = group_index + 1 < group_count;
            if groups_remain {
                tracing::info!(
                    completed_group = group_index + 1,
                    remaining_groups = group_count - group_index - 1,
                    pause_secs = self.config.pause_between_groups.as_secs_f64(),
                    "Group complete, pausing before next group"
                );
                tokio::time::sleep(self.config.pause_between_groups).await;
            }
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        tracing::info!(
            attempted = outcomes.len(),
            succeeded,
            failed = outcomes.len() - succeeded,
            "Batched fetch complete"
        );

        outcomes
    }

    /// One fetch-and-write attempt. Failures are classified transport vs
    /// generic and folded into the outcome instead of propagating.
    async fn fetch_one(&self, id: QueryId) -> FetchOutcome {
        let table = match self.fetcher.fetch(id).await {
            Ok(table) => table,
            Err(e) if e.is_transport() => {
                tracing::warn!(query_id = id.0, error = %e, "Transport failure fetching query");
                return FetchOutcome::TransportFailed {
                    id,
                    detail: e.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(query_id = id.0, error = %e, "Failed to fetch query");
                return FetchOutcome::Failed {
                    id,
                    detail: e.to_string(),
                };
            }
        };

        match self.writer.write(id, &table) {
            Ok(summary) => FetchOutcome::Written { id, summary },
            Err(e) => {
                tracing::error!(query_id = id.0, error = %e, "Failed to write query result");
                FetchOutcome::Failed {
                    id,
                    detail: e.to_string(),
                }
            }
        }
    }
}
