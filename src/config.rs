use serde::Deserialize;
use std::time::Duration;

/// Business rules applied while assembling a transaction draft.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftPolicy {
    /// Smallest accepted transfer, in currency minor units.
    pub min_transfer_amount: u64,
    /// Flat fee added at confirmation, in currency minor units.
    pub admin_fee: u64,
}

impl Default for DraftPolicy {
    fn default() -> Self {
        Self {
            min_transfer_amount: 10_000,
            admin_fee: 1_000,
        }
    }
}

/// Connection settings for the merchant lookup and submission services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Bearer token attached to every request, when present.
    pub token: Option<String>,
    /// Upper bound for each service call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            token: None,
            timeout_ms: 10_000,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
