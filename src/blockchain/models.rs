// src/blockchain/models.rs
use ethers_core::types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// --- Error types for the eligibility pipeline ---

/// A raw parameter could not be cast to the type its ABI slot declares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("invalid integer literal '{value}' for {abi_type}")]
    InvalidInteger { value: String, abi_type: String },
    #[error("integer literal '{value}' does not fit in 256 bits")]
    IntegerOverflow { value: String },
}

/// Call data could not be produced for the declared input types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unsupported ABI type: {0}")]
    UnsupportedType(String),
    #[error("value {value} is not compatible with ABI type {abi_type}")]
    TypeMismatch { abi_type: String, value: String },
    #[error("value {value} is out of range for ABI type {abi_type}")]
    OutOfRange { abi_type: String, value: String },
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid hex bytes for {abi_type}: {value}")]
    InvalidBytes { abi_type: String, value: String },
    #[error("expected {expected} parameters, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

/// Why a contract left no trace in the eligibility report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("missing ABI")]
    MissingAbi,
    #[error("missing method")]
    MissingMethod,
    #[error("missing chainId")]
    MissingChainId,
    #[error("method '{0}' not found in ABI")]
    MethodNotInAbi(String),
    #[error("parameter normalization error: {0}")]
    Parameter(#[from] ParameterError),
    #[error("params mismatch (expected {expected}, got {got})")]
    ParamCountMismatch { expected: usize, got: usize },
    #[error("call encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("returned an empty result")]
    NoAnswer,
    #[error("returned a result that is not a 256-bit hex integer: {0}")]
    MalformedResult(String),
}

impl SkipReason {
    /// `NoAnswer` is the normal outcome for ineligible wallets; every other reason
    /// points at a configuration or data problem.
    pub fn is_informational(&self) -> bool {
        matches!(self, SkipReason::NoAnswer)
    }
}

/// Failure of a whole `check_eligibility` batch.
#[derive(Error, Debug)]
pub enum EligibilityError {
    #[error("etherscan proxy request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read contracts config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid contracts config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// --- Contract configuration models ---

/// One input parameter of an ABI function entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One descriptor from a contract ABI. Fields other than type/name/inputs are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiInput>,
}

impl AbiEntry {
    pub fn is_function_named(&self, method: &str) -> bool {
        self.kind == "function" && self.name.as_deref() == Some(method)
    }
}

/// A configured contract to query. Missing fields are tolerated here and surface
/// as skips when the contract is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSpec {
    #[serde(default = "default_contract_name")]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_chain_id")]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub abi: Option<Vec<AbiEntry>>,
    #[serde(default, deserialize_with = "deserialize_param_tokens")]
    pub params: Vec<String>,
}

fn default_contract_name() -> String {
    "Unknown".to_string()
}

// chainId may be written as a number or a numeric string
fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("chainId must be a positive integer, got {}", n))),
        Some(serde_yaml::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_yaml::Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("chainId must be numeric, got '{}'", s))),
        Some(other) => Err(D::Error::custom(format!("unsupported chainId value: {:?}", other))),
    }
}

// params are textual tokens; YAML scalars like `1` or `true` are kept as their text
fn deserialize_param_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = Option::<Vec<serde_yaml::Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|v| match v {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!(
                "params must be scalar values, got {:?}",
                other
            ))),
        })
        .collect()
}

// --- Call models ---

/// A parameter value cast to what its ABI slot expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedParam {
    Integer { negative: bool, magnitude: U256 },
    Address(String),
    Bool(bool),
    Raw(String),
}

impl NormalizedParam {
    pub fn uint(value: u64) -> Self {
        NormalizedParam::Integer {
            negative: false,
            magnitude: U256::from(value),
        }
    }
}

impl std::fmt::Display for NormalizedParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizedParam::Integer { negative: true, magnitude } => write!(f, "-{}", magnitude),
            NormalizedParam::Integer { magnitude, .. } => write!(f, "{}", magnitude),
            NormalizedParam::Address(a) => write!(f, "{}", a),
            NormalizedParam::Bool(b) => write!(f, "{}", b),
            NormalizedParam::Raw(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Ok,
    Skipped,
}

/// Outcome of querying one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallResult {
    pub status: CallStatus,
    pub contract: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_eligible"
    )]
    pub eligible: Option<U256>,
}

impl CallResult {
    pub fn ok(contract: impl Into<String>, eligible: U256) -> Self {
        Self {
            status: CallStatus::Ok,
            contract: contract.into(),
            eligible: Some(eligible),
        }
    }

    pub fn skipped(contract: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Skipped,
            contract: contract.into(),
            eligible: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CallStatus::Ok
    }
}

// JSON integer when it fits in u64, decimal string beyond that
fn serialize_eligible<S>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) if v.bits() <= 64 => serializer.serialize_u64(v.as_u64()),
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Eligibility of one wallet across the configured contracts. Only `ok` results are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityReport {
    pub wallet: String,
    pub results: Vec<CallResult>,
}
