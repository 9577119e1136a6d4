// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers_core::types::U256;

// Re-export modules
pub mod agent;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Extraction, eligibility check and report formatting pipeline
    pub agent: Arc<agent::AirdropAgent>,
}

impl AppState {
    /// Builds the pipeline from configuration, loading the contract registry from disk.
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        use anyhow::Context;

        let checker = blockchain::EtherscanApi::from_config(&config)
            .context("Failed to load contract registry")?;
        let agent = agent::AirdropAgent::new(
            agent::Extractor::new(config.extractor_model.clone()),
            checker,
            agent::ResponseFormatter::new(config.formatter_model.clone()),
        );
        Ok(Self {
            config,
            agent: Arc::new(agent),
        })
    }
}
