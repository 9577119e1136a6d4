// src/blockchain/services/etherscan.rs
//
// Airdrop eligibility through read-only contract calls on the Etherscan V2 proxy
// (`module=proxy&action=eth_call`).

use std::sync::Arc;
use std::time::Duration;

use ethers_core::types::U256;
use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::blockchain::{
    abi::{encode_call, normalize_param, substitute_placeholder},
    models::{
        CallResult, ContractSpec, EligibilityError, EligibilityReport, NormalizedParam,
        RegistryError, SkipReason,
    },
    observer::{EligibilityObserver, TracingObserver},
    registry::ContractRegistry,
};
use crate::config::Config;

/// An `eth_call` ready to be sent for one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    pub chain_id: u64,
    pub to: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    result: Option<Value>,
}

/// Checks wallet eligibility against every contract in the registry.
#[derive(Clone)]
pub struct EtherscanApi {
    registry: ContractRegistry,
    api_url: String,
    api_key: String,
    delay: Duration,
    timeout: Duration,
    observer: Arc<dyn EligibilityObserver>,
}

impl EtherscanApi {
    pub fn new(registry: ContractRegistry, config: &Config) -> Self {
        Self {
            registry,
            api_url: config.etherscan_api_url.clone(),
            api_key: config.etherscan_api_key.clone(),
            delay: config.etherscan_delay,
            timeout: config.etherscan_timeout,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Loads the registry from `config.contracts_config_path`.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let registry = ContractRegistry::load(&config.contracts_config_path)?;
        Ok(Self::new(registry, config))
    }

    pub fn with_observer(mut self, observer: Arc<dyn EligibilityObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Queries every configured contract concurrently and keeps only `ok` answers.
    ///
    /// Data problems with a single contract skip that contract. A transport failure
    /// on any request fails the whole batch.
    pub async fn check_eligibility(
        &self,
        user_address: &str,
    ) -> Result<EligibilityReport, EligibilityError> {
        info!(
            wallet = user_address,
            contracts = self.registry.len(),
            "Checking airdrop eligibility"
        );

        // one connection pool per invocation, dropped on every exit path
        let client = Client::new();
        let tasks = self
            .registry
            .contracts()
            .iter()
            .map(|contract| self.query_contract(&client, contract, user_address));
        let results = try_join_all(tasks).await?;

        Ok(EligibilityReport {
            wallet: user_address.to_string(),
            results: results.into_iter().filter(CallResult::is_ok).collect(),
        })
    }

    async fn query_contract(
        &self,
        client: &Client,
        contract: &ContractSpec,
        user_address: &str,
    ) -> Result<CallResult, EligibilityError> {
        let call = match prepare_call(contract, user_address) {
            Ok(call) => call,
            Err(reason) => return Ok(self.skip(&contract.name, reason)),
        };

        let result = self.eth_call(client, &call).await?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match decode_result(result.as_ref()) {
            Ok(eligible) => {
                self.observer.on_eligible(&contract.name, eligible);
                Ok(CallResult::ok(contract.name.clone(), eligible))
            }
            Err(reason) => Ok(self.skip(&contract.name, reason)),
        }
    }

    async fn eth_call(
        &self,
        client: &Client,
        call: &PreparedCall,
    ) -> Result<Option<Value>, EligibilityError> {
        let chain_id = call.chain_id.to_string();
        debug!(chain_id = %chain_id, to = %call.to, data = %call.data, "Sending eth_call via proxy");

        let res = client
            .get(&self.api_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("module", "proxy"),
                ("action", "eth_call"),
                ("to", call.to.as_str()),
                ("data", call.data.as_str()),
                ("tag", "latest"),
                ("apikey", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;
        let body: ProxyResponse = res.json().await?;
        Ok(body.result)
    }

    fn skip(&self, contract: &str, reason: SkipReason) -> CallResult {
        self.observer.on_skipped(contract, &reason);
        CallResult::skipped(contract)
    }
}

/// Validates a contract descriptor and builds its call data for `user_address`.
pub fn prepare_call(contract: &ContractSpec, user_address: &str) -> Result<PreparedCall, SkipReason> {
    let abi = match contract.abi.as_deref() {
        Some(abi) if !abi.is_empty() => abi,
        _ => return Err(SkipReason::MissingAbi),
    };
    let method = match contract.method.as_deref() {
        Some(m) if !m.is_empty() => m,
        _ => return Err(SkipReason::MissingMethod),
    };
    let chain_id = match contract.chain_id {
        Some(id) if id != 0 => id,
        _ => return Err(SkipReason::MissingChainId),
    };

    let func = abi
        .iter()
        .find(|entry| entry.is_function_named(method))
        .ok_or_else(|| SkipReason::MethodNotInAbi(method.to_string()))?;
    let input_types: Vec<String> = func.inputs.iter().map(|i| i.kind.clone()).collect();

    // pairs are positional; surplus raw params are dropped
    let params = contract
        .params
        .iter()
        .zip(&input_types)
        .map(|(raw, ty)| normalize_param(substitute_placeholder(raw, user_address), ty))
        .collect::<Result<Vec<NormalizedParam>, _>>()?;

    if params.len() != input_types.len() {
        return Err(SkipReason::ParamCountMismatch {
            expected: input_types.len(),
            got: params.len(),
        });
    }

    let data = encode_call(method, &input_types, &params)?;

    Ok(PreparedCall {
        chain_id,
        to: contract.address.clone(),
        data,
    })
}

/// Interprets the proxy's `result` field as an unsigned amount. An absent, empty or
/// `0x` answer is `NoAnswer`.
pub fn decode_result(result: Option<&Value>) -> Result<U256, SkipReason> {
    let hex_result = match result {
        None | Some(Value::Null) => return Err(SkipReason::NoAnswer),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(SkipReason::MalformedResult(other.to_string())),
    };
    if hex_result.is_empty() || hex_result == "0x" {
        return Err(SkipReason::NoAnswer);
    }

    let malformed = || SkipReason::MalformedResult(hex_result.to_string());
    let digits = hex_result
        .strip_prefix("0x")
        .or_else(|| hex_result.strip_prefix("0X"))
        .unwrap_or(hex_result);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(significant, 16).map_err(|_| malformed())
}
