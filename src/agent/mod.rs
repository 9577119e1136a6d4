//! # Agent Module
//!
//! Wires the airdrop eligibility pipeline together:
//! user text → [`Extractor`] → wallet address → [`EtherscanApi`] → [`ResponseFormatter`]
//! → Markdown report.

pub mod chat;
pub mod extractor;
pub mod formatter;
pub mod prompts;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub use chat::ModelError;
pub use extractor::Extractor;
pub use formatter::ResponseFormatter;

use crate::blockchain::models::{EligibilityError, EligibilityReport};
use crate::blockchain::services::etherscan::EtherscanApi;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("no wallet address found in the request")]
    AddressNotFound,
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    #[serde(flatten)]
    pub report: EligibilityReport,
    pub markdown: String,
}

#[derive(Clone)]
pub struct AirdropAgent {
    extractor: Extractor,
    checker: EtherscanApi,
    formatter: ResponseFormatter,
}

impl AirdropAgent {
    pub fn new(extractor: Extractor, checker: EtherscanApi, formatter: ResponseFormatter) -> Self {
        Self {
            extractor,
            checker,
            formatter,
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn checker(&self) -> &EtherscanApi {
        &self.checker
    }

    pub fn formatter(&self) -> &ResponseFormatter {
        &self.formatter
    }

    /// Runs extraction, the eligibility check and report formatting for `prompt`.
    pub async fn run(&self, prompt: &str) -> Result<AgentReply, AgentError> {
        let wallet = self
            .extractor
            .extract(prompt)
            .await?
            .ok_or(AgentError::AddressNotFound)?;
        info!(wallet = %wallet, "Extracted wallet address");

        let report = self.checker.check_eligibility(&wallet).await?;
        let markdown = self.formatter.format(&report, prompt).await?;

        Ok(AgentReply { report, markdown })
    }
}
