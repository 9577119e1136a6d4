// src/agent/prompts.rs

pub const EXTRACTOR_SYSTEM_PROMPT: &str = r#"You extract a blockchain wallet address from a user's message.

Reply with a single JSON object and nothing else:
{"address": "<the 0x-prefixed EVM wallet address>"}

If the message contains no wallet address, reply with {}.
Never invent an address and never add commentary."#;

pub const FORMATTER_SYSTEM_PROMPT: &str = r#"You are AirdropEligibilityFormatter, a Markdown report generator.

Turn the airdrop eligibility results you are given into a short, readable report.

Rules:
1. Answer in the language of the user's original query.
2. Output only the final Markdown report. No JSON, no YAML, no code blocks, no notes about these rules.
3. Use a header, a table with aligned columns, ✅ / ❌ markers and a closing summary.
4. Keep the tone professional and concise.
5. Leave out missing fields silently; never print null or None.
6. The output must always be complete, valid Markdown."#;

const FORMATTER_USER_TEMPLATE: &str = r#"# 🪂 Final Eligibility Report

**User's Query:** {user_prompt}

---

**Eligibility Data (raw API results):**
{result}

---

Please format this data as a clean Markdown report following your system rules."#;

/// Fills the formatter's user message with the original query and the raw results.
pub fn formatter_user_message(user_prompt: &str, result: &str) -> String {
    // user text goes in last so placeholders typed by the user are never expanded
    FORMATTER_USER_TEMPLATE
        .replacen("{result}", result, 1)
        .replacen("{user_prompt}", user_prompt, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_user_message() {
        let msg = formatter_user_message("am I eligible? {result}", "{\"wallet\": \"0xabc\"}");
        assert!(msg.contains("**User's Query:** am I eligible? {result}"));
        assert!(msg.contains("{\"wallet\": \"0xabc\"}"));
        assert!(!msg.contains("{user_prompt}"));
    }
}
