// src/agent/chat.rs
//
// Minimal client for OpenAI-compatible chat completion endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ModelConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid JSON exchanged with model endpoint: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Request body; decoding is pinned to deterministic settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn deterministic(model: &str, max_tokens: u32, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            temperature: 0.0,
            messages,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ReplyMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    config: ModelConfig,
}

impl ChatClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Sends `[system, user]` and returns the first choice's content, if any.
    pub async fn complete(
        &self,
        system: &str,
        user: String,
        max_tokens: u32,
    ) -> Result<Option<String>, ModelError> {
        let payload = ChatCompletionRequest::deterministic(
            &self.config.model_name,
            max_tokens,
            vec![ChatMessage::system(system), ChatMessage::user(user)],
        );

        let resp = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        debug!(status = %status, model = %self.config.model_name, "Chat completion response status");

        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}
