//! Export of a finished run.

use super::depth::DepthLabel;
use super::events::{ItemOutcome, Terminal};
use super::progress::ProgressView;
use crate::error::{Result, VidsumError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output format for a run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = VidsumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(VidsumError::InvalidInput(format!(
                "Unknown report format: {} (expected markdown or json)",
                s
            ))),
        }
    }
}

/// One video in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportItem {
    pub index: usize,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub outcome: ItemOutcome,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub query: String,
    pub depth: i64,
    pub depth_label: DepthLabel,
    pub style: String,
    pub items: Vec<ReportItem>,
    pub outcome: Terminal,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Build a report from a finished view. Fails if the run has not ended.
    pub fn from_view(
        query: &str,
        depth: i64,
        depth_label: DepthLabel,
        style: &str,
        view: &ProgressView,
    ) -> Result<Self> {
        let outcome = view
            .terminal()
            .cloned()
            .ok_or_else(|| VidsumError::InvalidInput("run has not finished".to_string()))?;

        Ok(Self {
            query: query.to_string(),
            depth,
            depth_label,
            style: style.to_string(),
            items: view
                .items()
                .map(|(index, locator, outcome)| ReportItem {
                    index,
                    url: locator.url.clone(),
                    title: locator.title.clone(),
                    outcome: outcome.clone(),
                })
                .collect(),
            outcome,
            finished_at: Utc::now(),
        })
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Markdown => Ok(self.to_markdown()),
        }
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.query);
        out.push_str(&format!(
            "_Depth {} ({}), generated {}_\n\n",
            self.depth,
            self.depth_label,
            self.finished_at.format("%Y-%m-%d %H:%M UTC")
        ));

        out.push_str("## Final Summary\n\n");
        match &self.outcome {
            Terminal::FinalSummary { text } => out.push_str(text.trim()),
            Terminal::NoResults => out.push_str("No usable videos were found for this query."),
            Terminal::Error { reason } => out.push_str(&format!("The run failed: {}", reason)),
        }
        out.push_str("\n\n");

        if !self.items.is_empty() {
            out.push_str("## Videos\n");
            for item in &self.items {
                let name = item.title.as_deref().unwrap_or(&item.url);
                out.push_str(&format!("\n### {}. [{}]({})\n\n", item.index + 1, name, item.url));
                match &item.outcome {
                    ItemOutcome::Succeeded(text) => out.push_str(text.trim()),
                    ItemOutcome::Failed(reason) => out.push_str(&format!("_Skipped: {}_", reason)),
                    ItemOutcome::Pending => out.push_str("_Not summarized_"),
                }
                out.push('\n');
            }
        }

        out
    }
}
