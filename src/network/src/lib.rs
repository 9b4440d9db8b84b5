//! Network layer for the wallet console.
//!
//! This crate connects the console to a ledger node: the bootstrap state
//! machine that brings the link up with a bounded retry budget, the
//! [`Ledger`] seam and its REST implementation, and the transaction essence
//! that value transfers are signed over.

pub mod bootstrap;
pub mod client;
pub mod errors;
pub mod ledger;
pub mod transaction;
pub mod transport;
pub mod types;

// Re-export commonly used types and functions
pub use bootstrap::{
    spawn_bootstrap, BootstrapAction, BootstrapMonitor, ConnectivityEvent, NetworkBootstrap,
    NetworkState, DEFAULT_MAX_RETRIES,
};
pub use client::NodeClient;
pub use errors::{LedgerError, NetworkError};
pub use ledger::{Ledger, TransferRequest};
pub use transaction::{Essence, SignatureLockedOutput, UtxoInput};
pub use transport::{ConnectivityDriver, TcpProbe};
pub use types::{Endpoint, Indexation, MessageId, NodeInfo};
