// src/agent/extractor.rs

use serde_json::Value;
use tracing::{debug, warn};

use crate::agent::chat::{ChatClient, ModelError};
use crate::agent::prompts::EXTRACTOR_SYSTEM_PROMPT;
use crate::config::ModelConfig;

const MAX_TOKENS: u32 = 2000;

/// Pulls a wallet address out of free-form user text with a language model.
#[derive(Clone)]
pub struct Extractor {
    chat: ChatClient,
}

impl Extractor {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            chat: ChatClient::new(config),
        }
    }

    /// Returns the address the model found, or `None` when it found none or
    /// replied with something that is not the expected JSON object.
    pub async fn extract(&self, prompt: &str) -> Result<Option<String>, ModelError> {
        let content = self
            .chat
            .complete(EXTRACTOR_SYSTEM_PROMPT, prompt.to_string(), MAX_TOKENS)
            .await?
            .unwrap_or_else(|| "{}".to_string());
        debug!(reply = %content, "Extractor reply");
        Ok(parse_address_reply(&content))
    }
}

/// Reads the `address` field from the model's JSON reply.
pub fn parse_address_reply(content: &str) -> Option<String> {
    let data: Value = match serde_json::from_str(strip_code_fence(content)) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Extractor reply is not valid JSON");
            return None;
        }
    };

    match data.get("address") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!(address = %other, "Extractor returned a non-string address");
            None
        }
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (e.g. "json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_reply() {
        assert_eq!(
            parse_address_reply(r#"{"address": "0xAbC"}"#),
            Some("0xAbC".to_string())
        );
        assert_eq!(parse_address_reply("{}"), None);
        assert_eq!(parse_address_reply(r#"{"address": ""}"#), None);
        assert_eq!(parse_address_reply(r#"{"address": null}"#), None);
        assert_eq!(parse_address_reply(r#"{"address": {"evm": "0x1"}}"#), None);
        assert_eq!(parse_address_reply("no address here"), None);
        assert_eq!(parse_address_reply("[1, 2]"), None);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = "```json\n{\"address\": \"0x123\"}\n```";
        assert_eq!(parse_address_reply(fenced), Some("0x123".to_string()));
        let bare_fence = "```\n{\"address\": \"0x456\"}\n```";
        assert_eq!(parse_address_reply(bare_fence), Some("0x456".to_string()));
    }
}
