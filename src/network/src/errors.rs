/// Error types for the network crate.
use std::fmt;
use std::error::Error as StdError;

/// Errors that can occur while reaching the node.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Error when a connection attempt fails.
    ConnectionFailed(String),

    /// Error when a connection attempt does not complete in time.
    Timeout(String),

    /// Error when the bootstrap gave up after its retry budget.
    BootstrapFailed(u32),

    /// Error when a ledger command is issued before the network is up.
    NotConnected(String),

    /// Error when the network prefix could not be refreshed from the node.
    RefreshFailed(String),

    /// Error when an operation needs the network prefix and none is cached.
    PrefixUnknown,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            NetworkError::Timeout(msg) => write!(f, "Timeout waiting for {}", msg),
            NetworkError::BootstrapFailed(attempts) => {
                write!(f, "Network bootstrap failed after {} attempts", attempts)
            }
            NetworkError::NotConnected(state) => write!(f, "Network is not connected ({})", state),
            NetworkError::RefreshFailed(msg) => write!(f, "Network prefix refresh failed: {}", msg),
            NetworkError::PrefixUnknown => {
                write!(f, "Network prefix is unknown, run node_info_set or restart")
            }
        }
    }
}

impl StdError for NetworkError {}

/// Errors surfaced by the ledger library (transport, node, signing).
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Error when the HTTP request fails.
    Transport(String),

    /// Error when the node answers with an error body.
    Node {
        /// The node's error code
        code: String,
        /// The node's error message
        message: String,
    },

    /// Error when the node's answer cannot be understood.
    InvalidResponse(String),

    /// Error when the sender's unspent outputs do not cover the amount.
    InsufficientBalance {
        /// The amount to send
        required: u64,
        /// The unspent amount found
        available: u64,
    },

    /// Error when a transaction cannot be built or signed.
    Transaction(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Transport(msg) => write!(f, "Node request failed: {}", msg),
            LedgerError::Node { code, message } => write!(f, "Node error {}: {}", code, message),
            LedgerError::InvalidResponse(msg) => write!(f, "Invalid node response: {}", msg),
            LedgerError::InsufficientBalance { required, available } => write!(
                f,
                "Insufficient balance: required {}, available {}",
                required, available
            ),
            LedgerError::Transaction(msg) => write!(f, "Transaction error: {}", msg),
        }
    }
}

impl StdError for LedgerError {}

impl From<reqwest::Error> for LedgerError {
    fn from(error: reqwest::Error) -> Self {
        LedgerError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::InvalidResponse(error.to_string())
    }
}
