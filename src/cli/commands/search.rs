//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::discovery::{clamp_count, create_discovery};
use anyhow::Result;

/// List the videos discovery returns for `query`.
pub async fn run_search(query: &str, count: i64, settings: Settings) -> Result<()> {
    if query.trim().is_empty() {
        return Err(anyhow::anyhow!("query must not be empty"));
    }
    preflight::check(Operation::Search, &settings)?;

    let discovery = create_discovery(&settings)?;
    let count = clamp_count(count);

    let spinner = Output::spinner(&format!("Searching with {}...", discovery.name()));
    let results = discovery.search(query, count).await;
    spinner.finish_and_clear();

    match results {
        Ok(locators) if locators.is_empty() => {
            Output::warning("No videos found matching your query.");
        }
        Ok(locators) => {
            Output::success(&format!("Found {} videos", locators.len()));
            for (index, locator) in locators.iter().take(count as usize).enumerate() {
                Output::video(index, locator.title.as_deref(), &locator.url);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
