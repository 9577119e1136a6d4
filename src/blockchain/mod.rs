// src/blockchain/mod.rs

pub mod abi;
pub mod models;
pub mod observer;
pub mod registry;
pub mod services;

// Re-export commonly used types
pub use observer::{EligibilityObserver, TracingObserver};
pub use registry::ContractRegistry;
pub use services::etherscan::EtherscanApi;
