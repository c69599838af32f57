//! Per-video summarization.
//!
//! An [`ItemSummarizer`] turns one locator into one summary. The pipeline treats
//! each call as a single unreliable operation and never retries it.

mod llm;

pub use llm::TranscriptSummarizer;

use crate::discovery::Locator;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for summarizing a single video.
#[async_trait]
pub trait ItemSummarizer: Send + Sync {
    /// Summarize the video behind `locator`, following the `style` directive.
    async fn summarize(&self, locator: &Locator, style: &str) -> Result<String>;
}
