// src/blockchain/registry.rs

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::blockchain::models::{ContractSpec, RegistryError};

#[derive(Debug, Default, Deserialize)]
struct ContractsDocument {
    #[serde(default)]
    contracts: Vec<ContractGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct ContractGroup {
    #[serde(default)]
    evm: Vec<serde_yaml::Value>,
}

/// The contracts to query, in configuration order. Loaded once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: Vec<ContractSpec>,
}

impl ContractRegistry {
    pub fn new(contracts: Vec<ContractSpec>) -> Self {
        Self { contracts }
    }

    /// Reads and parses the contracts YAML document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_yaml_str(&text)?;
        info!(
            path = %path.display(),
            contracts = registry.len(),
            "Loaded contract registry"
        );
        Ok(registry)
    }

    /// Parses the `evm` list of the first contract group.
    ///
    /// Descriptors that do not deserialize into a [`ContractSpec`] are dropped with a
    /// warning; missing optional fields are left for the eligibility check to report.
    pub fn from_yaml_str(text: &str) -> Result<Self, RegistryError> {
        let doc: Option<ContractsDocument> = serde_yaml::from_str(text)?;
        let evm = doc
            .and_then(|d| d.contracts.into_iter().next())
            .map(|g| g.evm)
            .unwrap_or_default();

        let mut contracts = Vec::with_capacity(evm.len());
        for (index, raw) in evm.into_iter().enumerate() {
            match serde_yaml::from_value::<ContractSpec>(raw) {
                Ok(spec) => contracts.push(spec),
                Err(e) => warn!(index, error = %e, "Malformed contract descriptor, skipped"),
            }
        }
        Ok(Self { contracts })
    }

    pub fn contracts(&self) -> &[ContractSpec] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
contracts:
  - evm:
      - name: Alpha
        address: "0x1111111111111111111111111111111111111111"
        chainId: 1
        method: claimableTokens
        abi:
          - type: function
            name: claimableTokens
            stateMutability: view
            inputs:
              - { name: user, type: address }
            outputs:
              - { name: "", type: uint256 }
        params: ["{user_address}"]
      - name: Beta
        address: "0x2222222222222222222222222222222222222222"
        chainId: 42161
      - name: Alpha
        address: "0x1111111111111111111111111111111111111111"
        chainId: 1
  - evm:
      - name: Ignored
"#;

    #[test]
    fn test_loads_first_group_in_order_with_duplicates() {
        let registry = ContractRegistry::from_yaml_str(CONFIG).unwrap();
        let names: Vec<_> = registry.contracts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Alpha"]);

        let alpha = &registry.contracts()[0];
        assert_eq!(alpha.chain_id, Some(1));
        assert_eq!(alpha.method.as_deref(), Some("claimableTokens"));
        let abi = alpha.abi.as_ref().unwrap();
        assert_eq!(abi[0].inputs[0].kind, "address");
        assert_eq!(alpha.params, vec!["{user_address}"]);

        assert_eq!(registry.contracts()[1].method, None);
    }

    #[test]
    fn test_empty_or_missing_groups() {
        assert!(ContractRegistry::from_yaml_str("").unwrap().is_empty());
        assert!(ContractRegistry::from_yaml_str("contracts: []").unwrap().is_empty());
        assert!(ContractRegistry::from_yaml_str("contracts:\n  - {}\n").unwrap().is_empty());
        assert!(ContractRegistry::from_yaml_str("other: 1").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_descriptor_is_quarantined() {
        let yaml = r#"
contracts:
  - evm:
      - name: Broken
        abi: "not a list"
      - name: Fine
        chainId: 10
"#;
        let registry = ContractRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.contracts()[0].name, "Fine");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            ContractRegistry::from_yaml_str("contracts: [unclosed"),
            Err(RegistryError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let registry = ContractRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 3);

        let missing = ContractRegistry::load("/nonexistent/contracts.yml");
        assert!(matches!(missing, Err(RegistryError::Io { .. })));
    }
}
