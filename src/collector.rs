//! Query-identifier collection from repeated user prompts.

use crate::error::Result;
use crate::prompt::Prompt;
use crate::types::QueryId;

/// Collect query IDs until the user submits an empty line.
///
/// Non-numeric input is rejected with a message and re-prompted — it never
/// aborts collection. Duplicates are allowed and entry order is preserved.
/// The returned list may be empty.
pub fn collect_query_ids(prompt: &mut dyn Prompt) -> Result<Vec<QueryId>> {
    let mut ids = Vec::new();

    loop {
        let line = prompt.read_line("Enter a Dune query ID (empty line to finish):")?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            break;
        }

        match trimmed.parse::<QueryId>() {
            Ok(id) if trimmed.chars().all(|c| c.is_ascii_digit()) => {
                tracing::debug!(query_id = id.0, "Collected query ID");
                ids.push(id);
            }
            _ => {
                prompt.say(&format!("Invalid query ID '{trimmed}'. Must be a number."))?;
            }
        }
    }

    Ok(ids)
}
