// src/config.rs

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Connection settings for an OpenAI-compatible chat completion endpoint.
#[derive(Clone, Debug, Default)]
pub struct ModelConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: String,
}

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Path to the YAML document listing the contracts to query
    pub contracts_config_path: String,

    // Etherscan proxy settings
    pub etherscan_api_url: String,
    pub etherscan_api_key: String,
    /// Pause applied by each contract task after its request completes
    pub etherscan_delay: Duration,
    pub etherscan_timeout: Duration,

    // Language model endpoints
    pub extractor_model: ModelConfig,
    pub formatter_model: ModelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            contracts_config_path: "contracts.yml".to_string(),
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            etherscan_api_key: String::new(),
            etherscan_delay: Duration::ZERO,
            etherscan_timeout: Duration::from_secs(30),
            extractor_model: ModelConfig::default(),
            formatter_model: ModelConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let etherscan_delay = env::var("ETHERSCAN_DELAY")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<f64>()
            .context("ETHERSCAN_DELAY must be a number of seconds")?;
        if !etherscan_delay.is_finite() || etherscan_delay < 0.0 {
            anyhow::bail!("ETHERSCAN_DELAY must be a non-negative number of seconds");
        }

        let etherscan_timeout = env::var("ETHERSCAN_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("ETHERSCAN_TIMEOUT must be a whole number of seconds")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("PORT must be a valid number")?,

            contracts_config_path: env::var("CONTRACTS_CONFIG_PATH")
                .unwrap_or(defaults.contracts_config_path),

            etherscan_api_url: env::var("ETHERSCAN_API_URL")
                .unwrap_or(defaults.etherscan_api_url),
            etherscan_api_key: env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
            etherscan_delay: Duration::from_secs_f64(etherscan_delay),
            etherscan_timeout: Duration::from_secs(etherscan_timeout),

            extractor_model: ModelConfig {
                api_url: env::var("EXTRACTOR_MODEL_API_URL").unwrap_or_default(),
                model_name: env::var("EXTRACTOR_MODEL_NAME").unwrap_or_default(),
                api_key: env::var("EXTRACTOR_MODEL_API_KEY").unwrap_or_default(),
            },
            formatter_model: ModelConfig {
                api_url: env::var("MODEL_API_URL").unwrap_or_default(),
                model_name: env::var("MODEL_NAME").unwrap_or_default(),
                api_key: env::var("MODEL_API_KEY").unwrap_or_default(),
            },
        })
    }
}
