//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, VidsumError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client with a custom timeout.
///
/// Each summarizer and aggregator call is bounded by this timeout; the
/// pipeline itself adds none.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| VidsumError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Send a system + user prompt pair and return the first choice's text.
pub async fn complete(
    client: &Client<OpenAIConfig>,
    model: &str,
    temperature: f32,
    system: &str,
    user: &str,
) -> Result<String> {
    use async_openai::types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    };

    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system.to_string())
            .build()
            .map_err(|e| VidsumError::OpenAI(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user.to_string())
            .build()
            .map_err(|e| VidsumError::OpenAI(e.to_string()))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .temperature(temperature)
        .build()
        .map_err(|e| VidsumError::OpenAI(e.to_string()))?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| VidsumError::OpenAI(format!("Chat completion failed: {}", e)))?;

    response
        .choices
        .first()
        .and_then(|c| c.message.content.as_ref())
        .filter(|text| !text.trim().is_empty())
        .cloned()
        .ok_or_else(|| VidsumError::OpenAI("Empty response from LLM".to_string()))
}
