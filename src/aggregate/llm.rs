//! Chat completion aggregator.

use super::{Aggregator, LabeledSummary};
use crate::config::{LlmSettings, Prompts};
use crate::error::{Result, VidsumError};
use crate::openai::{complete, create_client_with_timeout};
use crate::pipeline::DepthLabel;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Merges summaries with a single chat completion.
pub struct LlmAggregator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl LlmAggregator {
    pub fn new(llm: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(llm.timeout_secs))?,
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

    fn user_prompt(
        &self,
        query: &str,
        depth: &DepthLabel,
        style: &str,
        summaries: &[LabeledSummary],
    ) -> Result<String> {
        let mut lines = Vec::with_capacity(summaries.len());
        for summary in summaries {
            lines.push(serde_json::to_string(summary)?);
        }

        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        vars.insert("depth".to_string(), depth.to_string());
        vars.insert("style".to_string(), style.to_string());
        vars.insert("summaries".to_string(), lines.join("\n"));
        Ok(self.prompts.render_with_custom(&self.prompts.merge.user, &vars))
    }
}

#[async_trait]
impl Aggregator for LlmAggregator {
    #[instrument(skip(self, style, summaries), fields(count = summaries.len(), depth = %depth))]
    async fn merge(
        &self,
        query: &str,
        depth: &DepthLabel,
        style: &str,
        summaries: &[LabeledSummary],
    ) -> Result<String> {
        if summaries.is_empty() {
            return Err(VidsumError::Aggregation(
                "no summaries to merge".to_string(),
            ));
        }

        let user = self.user_prompt(query, depth, style, summaries)?;
        debug!("Merge prompt is {} bytes", user.len());

        complete(
            &self.client,
            &self.model,
            self.temperature,
            &self.prompts.merge.system,
            &user,
        )
        .await
        .map_err(|e| VidsumError::Aggregation(e.to_string()))
    }
}
