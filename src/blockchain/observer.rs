// src/blockchain/observer.rs

use ethers_core::types::U256;
use tracing::{debug, info, warn};

use crate::blockchain::models::SkipReason;

/// Receives per-contract outcomes of an eligibility check.
///
/// Skipped contracts never show up in the report, so this is the only place their
/// reasons are visible.
pub trait EligibilityObserver: Send + Sync {
    fn on_skipped(&self, contract: &str, reason: &SkipReason);

    fn on_eligible(&self, _contract: &str, _eligible: U256) {}
}

/// Default observer: forwards outcomes to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EligibilityObserver for TracingObserver {
    fn on_skipped(&self, contract: &str, reason: &SkipReason) {
        if reason.is_informational() {
            info!("[{}] {}, skipped", contract, reason);
        } else {
            warn!("[{}] {}, skipped", contract, reason);
        }
    }

    fn on_eligible(&self, contract: &str, eligible: U256) {
        debug!(contract, %eligible, "Contract returned eligibility amount");
    }
}
