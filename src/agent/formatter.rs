// src/agent/formatter.rs

use crate::agent::chat::{ChatClient, ModelError};
use crate::agent::prompts::{formatter_user_message, FORMATTER_SYSTEM_PROMPT};
use crate::blockchain::models::EligibilityReport;
use crate::config::ModelConfig;

const MAX_TOKENS: u32 = 8192;

/// Returned when the model reply carries no content.
pub const REPORT_FAILED: &str = "Report formatting failed.";

/// Renders an eligibility report as Markdown with a language model.
#[derive(Clone)]
pub struct ResponseFormatter {
    chat: ChatClient,
}

impl ResponseFormatter {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            chat: ChatClient::new(config),
        }
    }

    pub async fn format(
        &self,
        report: &EligibilityReport,
        user_prompt: &str,
    ) -> Result<String, ModelError> {
        let result = serde_json::to_string_pretty(report)?;
        let reply = self
            .chat
            .complete(
                FORMATTER_SYSTEM_PROMPT,
                formatter_user_message(user_prompt, &result),
                MAX_TOKENS,
            )
            .await?;
        Ok(reply.unwrap_or_else(|| REPORT_FAILED.to_string()))
    }
}
