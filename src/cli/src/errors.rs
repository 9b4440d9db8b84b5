//! Error types for the wallet console.

use network::errors::{LedgerError, NetworkError};
use std::error::Error as StdError;
use std::fmt;
use wallet_core::errors::{
    AddressFormatError, ConfigError, DerivationError, RangeError, ValueRangeError,
};

/// Errors that can occur while running a console command.
#[derive(Debug)]
pub enum WalletError {
    /// Error when the configuration is invalid.
    Config(ConfigError),

    /// Error when an index range ends before it starts.
    Range(RangeError),

    /// Error when a receiver address cannot be resolved.
    AddressFormat(AddressFormatError),

    /// Error when an amount does not fit in base units.
    ValueRange(ValueRangeError),

    /// Error when a key cannot be derived.
    Derivation(DerivationError),

    /// Error when the network is unavailable.
    Network(NetworkError),

    /// Error reported by the ledger library.
    Ledger(LedgerError),

    /// Error when command arguments do not match the command's schema.
    Usage(String),

    /// Error when a ledger command runs without a wallet session.
    SessionUnavailable,

    /// Error when a file operation fails.
    Io(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    Json(serde_json::Error),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::Config(e) => write!(f, "Config error: {}", e),
            WalletError::Range(e) => write!(f, "{}", e),
            WalletError::AddressFormat(e) => write!(f, "{}", e),
            WalletError::ValueRange(e) => write!(f, "{}", e),
            WalletError::Derivation(e) => write!(f, "Derivation error: {}", e),
            WalletError::Network(e) => write!(f, "Network error: {}", e),
            WalletError::Ledger(e) => write!(f, "Ledger error: {}", e),
            WalletError::Usage(usage) => write!(f, "Usage: {}", usage),
            WalletError::SessionUnavailable => {
                write!(f, "Wallet session unavailable, check the configuration")
            }
            WalletError::Io(e) => write!(f, "IO error: {}", e),
            WalletError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl StdError for WalletError {}

impl From<ConfigError> for WalletError {
    fn from(error: ConfigError) -> Self {
        WalletError::Config(error)
    }
}

impl From<RangeError> for WalletError {
    fn from(error: RangeError) -> Self {
        WalletError::Range(error)
    }
}

impl From<AddressFormatError> for WalletError {
    fn from(error: AddressFormatError) -> Self {
        WalletError::AddressFormat(error)
    }
}

impl From<ValueRangeError> for WalletError {
    fn from(error: ValueRangeError) -> Self {
        WalletError::ValueRange(error)
    }
}

impl From<DerivationError> for WalletError {
    fn from(error: DerivationError) -> Self {
        WalletError::Derivation(error)
    }
}

impl From<NetworkError> for WalletError {
    fn from(error: NetworkError) -> Self {
        WalletError::Network(error)
    }
}

impl From<LedgerError> for WalletError {
    fn from(error: LedgerError) -> Self {
        WalletError::Ledger(error)
    }
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::Io(error)
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(error: serde_json::Error) -> Self {
        WalletError::Json(error)
    }
}
