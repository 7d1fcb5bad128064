//! Interactive dune-batch binary — loads configuration from the environment
//! and runs the two-action menu.

use dune_batch::{Config, DuneClient, StdinPrompt, menu};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // .env is optional; a missing file just means the key must come from the
    // process environment
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let client = match DuneClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build Dune API client");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut prompt = StdinPrompt::stdin();
    if let Err(e) = menu::run(&config, &client, &mut prompt).await {
        tracing::error!(error = %e, "Session ended with an error");
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
