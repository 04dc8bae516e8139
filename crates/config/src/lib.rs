//! The configuration record: every option recognized by the core, gathered in
//! one place so components take a `&Config` rather than reaching for ambient globals.
//! Process bootstrap and CLI flag parsing that ultimately produce a `Config` are out
//! of scope; this crate only defines the record and its defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator_sdk::{Hash, Lamports, Slot};

/// Rent parameters consumed by the SVM pipeline's rent calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentConfig {
    pub lamports_per_byte_year: Lamports,
    pub exemption_threshold: f64,
    pub slots_per_epoch: Slot,
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3_480,
            exemption_threshold: 2.0,
            slots_per_epoch: 432_000,
        }
    }
}

/// Bounds and timeouts for concurrent ingress paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Capacity of the bounded peer-ingress work queue; never below 256.
    pub peer_ingress_queue_capacity: usize,
    /// Producer timeout in milliseconds on the bounded peer-ingress queue.
    pub peer_ingress_timeout_ms: u64,
    /// Wall-clock budget in seconds for parse-to-dispatch of one RPC request.
    pub rpc_request_timeout_secs: u64,
    /// Grace window in slots within which a vote's slot may exceed the current max.
    pub vote_slot_grace_window: Slot,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            peer_ingress_queue_capacity: 256,
            peer_ingress_timeout_ms: 100,
            rpc_request_timeout_secs: 10,
            vote_slot_grace_window: 150,
        }
    }
}

/// Top-level configuration record, consumed by all components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted ledger (`blocks/` + `slot_index`).
    pub ledger_path: PathBuf,
    /// Genesis block hash for this network. Left as a configuration input rather
    /// than derived in-core.
    pub genesis_hash: Hash,
    /// Maximum account data size loadable by one transaction.
    pub max_loaded_accounts_data_size: usize,
    /// Address the JSON-RPC HTTP server binds to.
    pub rpc_bind_address: String,
    pub rent: RentConfig,
    pub concurrency: ConcurrencyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("ledger"),
            genesis_hash: Hash::default(),
            max_loaded_accounts_data_size: 64 * 1024 * 1024,
            rpc_bind_address: "127.0.0.1:8899".to_string(),
            rent: RentConfig::default(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_toml_fills_remaining_fields_from_default() {
        let text = r#"
            ledger_path = "/tmp/ledger"
            genesis_hash = [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]
            max_loaded_accounts_data_size = 1048576
            rpc_bind_address = "127.0.0.1:8899"

            [rent]
            lamports_per_byte_year = 3480
            exemption_threshold = 2.0
            slots_per_epoch = 432000

            [concurrency]
            peer_ingress_queue_capacity = 256
            peer_ingress_timeout_ms = 100
            rpc_request_timeout_secs = 10
            vote_slot_grace_window = 150
        "#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.ledger_path, PathBuf::from("/tmp/ledger"));
    }
}
