//! Transcript retrieval for vidsum.
//!
//! A transcript is the caption track of one video. Fetchers turn a video ID
//! into a [`Transcript`]; [`Transcript::to_prompt_text`] renders it for the model.

mod service;
mod ytdlp;

pub use service::TranscriptService;
pub use ytdlp::YtdlpTranscripts;

use crate::config::{Settings, TranscriptProvider};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// The caption track of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(video_id: String, entries: Vec<TranscriptEntry>) -> Self {
        Self { video_id, entries }
    }

    /// True when there is no caption text at all.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.text.trim().is_empty())
    }

    /// Render one line per entry, keeping timing so the model can cite timestamps.
    pub fn to_prompt_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "start: {}; duration: {:.2}; text: \"{}\";",
                    entry.start, entry.duration, entry.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for transcript sources.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript for a YouTube video ID.
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

/// Create the transcript fetcher selected in settings.
pub fn create_fetcher(settings: &Settings) -> Result<Arc<dyn TranscriptFetcher>> {
    match settings.transcript.provider {
        TranscriptProvider::Service => Ok(Arc::new(TranscriptService::with_config(
            &settings.transcript.service_url,
            settings.transcript.timeout_secs,
        )?)),
        TranscriptProvider::Ytdlp => Ok(Arc::new(YtdlpTranscripts::with_languages(
            settings.transcript.languages.clone(),
        ))),
    }
}
