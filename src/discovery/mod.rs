//! Video discovery for vidsum.
//!
//! Provides a trait-based interface over search backends (YouTube Data API, yt-dlp)
//! and the `Locator` type that identifies one video through the rest of the pipeline.

mod youtube_api;
mod ytdlp;

pub use youtube_api::YoutubeApiDiscovery;
pub use ytdlp::YtdlpDiscovery;

use crate::config::{DiscoveryProvider, Settings};
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Smallest number of videos a run may request.
pub const MIN_COUNT: u32 = 1;
/// Largest number of videos a run may request.
pub const MAX_COUNT: u32 = 50;

/// Clamp a caller-supplied depth into the discovery count range.
pub fn clamp_count(depth: i64) -> u32 {
    depth.clamp(MIN_COUNT as i64, MAX_COUNT as i64) as u32
}

/// Opaque reference to one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Canonical URL of the video.
    pub url: String,
    /// Title as reported by discovery (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Locator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build a locator for a YouTube video ID.
    pub fn from_video_id(video_id: &str) -> Self {
        Self::new(format!("https://www.youtube.com/watch?v={}", video_id))
    }

    /// Extract the 11-character YouTube video ID, if the URL has one.
    pub fn video_id(&self) -> Option<String> {
        extract_video_id(&self.url)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.url),
            None => write!(f, "{}", self.url),
        }
    }
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:
                    youtube\.com/(?:watch\?(?:[^\s]*&)?v=|embed/|v/|shorts/)
                    |
                    youtu\.be/
                )
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("video id regex is valid")
    })
}

/// Extract a video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Trait for video search backends.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Return up to `count` locators for `query`, best match first.
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Locator>>;
}

/// Create the discovery backend selected in settings.
pub fn create_discovery(settings: &Settings) -> Result<Arc<dyn Discovery>> {
    match settings.discovery.provider {
        DiscoveryProvider::Api => {
            let api_key = settings.discovery.resolved_api_key().ok_or_else(|| {
                VidsumError::Config(
                    "YouTube API key not set. Set discovery.api_key or export YOUTUBE_API_KEY, \
                     or use discovery.provider = \"ytdlp\""
                        .to_string(),
                )
            })?;
            Ok(Arc::new(YoutubeApiDiscovery::with_config(
                &settings.discovery.api_base_url,
                &api_key,
                settings.discovery.timeout_secs,
            )?))
        }
        DiscoveryProvider::Ytdlp => Ok(Arc::new(YtdlpDiscovery::new())),
    }
}
