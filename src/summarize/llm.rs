//! Transcript + chat completion summarizer.

use super::ItemSummarizer;
use crate::config::{LlmSettings, Prompts};
use crate::discovery::Locator;
use crate::error::{Result, VidsumError};
use crate::openai::{complete, create_client_with_timeout};
use crate::transcript::TranscriptFetcher;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Summarizes a video by fetching its transcript and asking the model for bullet points.
pub struct TranscriptSummarizer {
    client: Client<OpenAIConfig>,
    fetcher: Arc<dyn TranscriptFetcher>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl TranscriptSummarizer {
    pub fn new(fetcher: Arc<dyn TranscriptFetcher>, llm: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(llm.timeout_secs))?,
            fetcher,
            model: llm.model.clone(),
            temperature: llm.temperature,
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn user_prompt(&self, transcript_text: String, style: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript_text);
        vars.insert("style".to_string(), style.to_string());
        self.prompts.render_with_custom(&self.prompts.item.user, &vars)
    }
}

#[async_trait]
impl ItemSummarizer for TranscriptSummarizer {
    #[instrument(skip(self, style), fields(url = %locator.url))]
    async fn summarize(&self, locator: &Locator, style: &str) -> Result<String> {
        let video_id = locator
            .video_id()
            .ok_or_else(|| VidsumError::InvalidLocator(locator.url.clone()))?;

        let transcript = self.fetcher.fetch(&video_id).await?;
        if transcript.is_empty() {
            return Err(VidsumError::Transcript(format!(
                "{} has no caption text",
                video_id
            )));
        }
        debug!("Transcript has {} entries", transcript.entries.len());

        let user = self.user_prompt(transcript.to_prompt_text(), style);
        let summary = complete(
            &self.client,
            &self.model,
            self.temperature,
            &self.prompts.item.system,
            &user,
        )
        .await
        .map_err(|e| VidsumError::Summarization(format!("{}: {}", video_id, e)))?;

        Ok(summary)
    }
}
