//! HTTP transcript service client.

use super::{Transcript, TranscriptEntry, TranscriptFetcher};
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Client for a service exposing `GET /transcript?video_id=...`.
pub struct TranscriptService {
    client: reqwest::Client,
    base_url: String,
}

impl TranscriptService {
    pub fn with_config(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn transcript_url(&self, video_id: &str) -> Result<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/transcript", self.base_url),
            &[("video_id", video_id)],
        )?)
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl TranscriptFetcher for TranscriptService {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let response = self
            .client
            .get(self.transcript_url(video_id)?)
            .send()
            .await
            .map_err(|e| VidsumError::Transcript(format!("transcript service unreachable: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(VidsumError::Transcript(format!(
                "{} ({}): {}",
                video_id, status, reason
            )));
        }

        let parsed: TranscriptResponse = serde_json::from_str(&body).map_err(|e| {
            VidsumError::Transcript(format!("malformed transcript for {}: {}", video_id, e))
        })?;

        debug!("Fetched {} transcript entries", parsed.transcript.len());
        Ok(Transcript::new(video_id.to_string(), parsed.transcript))
    }
}
