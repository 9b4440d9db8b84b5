//! Configuration for the wallet console.

use anyhow::Result;
use network::types::Endpoint;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wallet_core::derivation::{DerivationPath, DEFAULT_DERIVATION_ROOT};
use wallet_core::errors::ConfigError;
use wallet_core::types::{Seed, MAX_INDEX_BYTES, RANDOM_SEED_SENTINEL};

/// Environment variable overriding the node URL.
pub const ENV_NODE_URL: &str = "WALLET_NODE_URL";
/// Environment variable overriding the node port.
pub const ENV_NODE_PORT: &str = "WALLET_NODE_PORT";
/// Environment variable overriding the seed.
pub const ENV_SEED: &str = "WALLET_SEED";

/// Configuration for the wallet console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// The node to connect to
    pub node_url: String,
    /// The node port, 0 to use the URL's port
    pub node_port: u16,
    /// 64 hex characters, or "random" for a fresh seed at every boot
    pub seed: String,
    /// Hardened derivation root, addresses are derived below it
    pub derivation_path: String,
    /// Connection attempts before the bootstrap gives up
    pub max_retries: u32,
    /// Timeout of one connection attempt and of node requests
    pub connect_timeout_secs: u64,
    /// Pause between connection attempts
    pub retry_delay_millis: u64,
    /// Index attached to indexation payloads
    pub message_index: String,
    /// Data attached to `send` when no message is given
    pub message_data: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            node_url: "https://api.lb-0.testnet.chrysalis2.com".to_string(),
            node_port: 0,
            seed: RANDOM_SEED_SENTINEL.to_string(),
            derivation_path: DEFAULT_DERIVATION_ROOT.to_string(),
            max_retries: network::DEFAULT_MAX_RETRIES,
            connect_timeout_secs: 10,
            retry_delay_millis: 1000,
            message_index: "Wallet Console".to_string(),
            message_data: "sent from the wallet console".to_string(),
        }
    }
}

/// Configuration that passed validation, ready to build a session from.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// The node endpoint
    pub endpoint: Endpoint,
    /// The wallet seed
    pub seed: Seed,
    /// The derivation root
    pub derivation_root: DerivationPath,
    /// Connection attempts before the bootstrap gives up
    pub max_retries: u32,
    /// Timeout of one connection attempt and of node requests
    pub connect_timeout: Duration,
    /// Pause between connection attempts
    pub retry_delay: Duration,
    /// Index attached to indexation payloads
    pub message_index: String,
    /// Data attached to `send` when no message is given
    pub message_data: String,
}

impl WalletConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the per-user configuration file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wallet-console").join("config.json"))
    }

    /// Loads the explicit file if given, else the per-user file if present,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Applies the `WALLET_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_NODE_URL) {
            self.node_url = url;
        }
        if let Ok(port) = std::env::var(ENV_NODE_PORT) {
            self.node_port = port.parse().map_err(|_| ConfigError::InvalidEndpoint {
                url: self.node_url.clone(),
                reason: format!("invalid port {}", port),
            })?;
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            self.seed = seed;
        }
        Ok(())
    }

    /// Checks the configuration and resolves it into session inputs.
    ///
    /// A random seed is drawn here, so every call yields a new wallet when
    /// the seed is configured as "random".
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let endpoint = Endpoint::parse(&self.node_url, Some(self.node_port))?;
        let seed = Seed::from_config(&self.seed)?;

        let derivation_root: DerivationPath =
            self.derivation_path
                .parse()
                .map_err(|e| ConfigError::InvalidDerivationPath {
                    path: self.derivation_path.clone(),
                    reason: format!("{}", e),
                })?;

        if self.max_retries == 0 {
            return Err(ConfigError::InvalidRetryLimit(self.max_retries));
        }

        let index_len = self.message_index.len();
        if index_len == 0 || index_len > MAX_INDEX_BYTES {
            return Err(ConfigError::InvalidMessageIndex(index_len));
        }

        Ok(ValidatedConfig {
            endpoint,
            seed,
            derivation_root,
            max_retries: self.max_retries,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            retry_delay: Duration::from_millis(self.retry_delay_millis),
            message_index: self.message_index.clone(),
            message_data: self.message_data.clone(),
        })
    }
}
