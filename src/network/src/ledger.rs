//! The ledger seam between the console and a node.

use crate::errors::LedgerError;
use crate::types::{Endpoint, Indexation, MessageId, NodeInfo};
use async_trait::async_trait;
use ed25519_dalek::Keypair;
use wallet_core::types::Ed25519Address;

/// A value transfer signed by one derived key.
pub struct TransferRequest<'a> {
    /// Key of the sending address
    pub signer: &'a Keypair,
    /// Address receiving the value
    pub receiver: Ed25519Address,
    /// Amount in base units, never zero
    pub amount: u64,
    /// Optional data attached to the transfer
    pub indexation: Option<Indexation>,
}

/// Operations the console performs against a ledger node.
///
/// Every call names the endpoint explicitly so the console can switch nodes
/// without rebuilding the ledger.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetches the node's status.
    async fn node_info(&self, endpoint: &Endpoint) -> Result<NodeInfo, LedgerError>;

    /// Fetches the balance of an address in base units.
    async fn balance(
        &self,
        endpoint: &Endpoint,
        address: &Ed25519Address,
    ) -> Result<u64, LedgerError>;

    /// Submits a message carrying only an indexation payload.
    async fn send_indexation(
        &self,
        endpoint: &Endpoint,
        indexation: &Indexation,
    ) -> Result<MessageId, LedgerError>;

    /// Builds, signs and submits a value transfer.
    async fn send_transfer(
        &self,
        endpoint: &Endpoint,
        request: TransferRequest<'_>,
    ) -> Result<MessageId, LedgerError>;
}
