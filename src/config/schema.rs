//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ThorConfig {
    /// Node endpoints.
    pub node: NodeConfig,

    /// Defaults applied when building transactions.
    pub transactions: TransactionsConfig,

    /// Receipt polling budgets.
    pub confirmation: ConfirmationConfig,

    /// Fee delegation service.
    pub delegation: DelegationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Thor node REST endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Primary node URL.
    pub url: String,

    /// Equivalent nodes tried in order when the primary fails.
    pub failover_urls: Vec<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8669".to_string(),
            failover_urls: Vec::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransactionsConfig {
    /// Blocks after the block reference during which a transaction is valid.
    pub expiration: u32,

    /// Gas price coefficient (0-255) applied unless overridden.
    pub gas_price_coef: u8,
}

impl Default for TransactionsConfig {
    fn default() -> Self {
        Self {
            expiration: 30,
            gas_price_coef: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Blocks to wait for a receipt with the block-bounded policy.
    pub wait_blocks: u32,

    /// Wall-clock cap in seconds on the block-bounded wait.
    pub wait_timeout_secs: u64,

    /// Interval of the time-bounded policy in milliseconds.
    pub poll_interval_ms: u64,

    /// Random extra pause per attempt in milliseconds.
    pub jitter_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            wait_blocks: 6,
            wait_timeout_secs: 60,
            poll_interval_ms: 500,
            jitter_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct DelegationConfig {
    /// Delegation service URL; unset disables remote delegation.
    pub url: Option<String>,

    /// Address the service signs as.
    pub gas_payer: Option<String>,

    /// Request timeout in seconds (0 falls back to the node timeout).
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
