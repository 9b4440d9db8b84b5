//! The wallet session owned by the console.

use crate::config::ValidatedConfig;
use crate::errors::WalletError;
use futures::stream::{self, Stream, StreamExt};
use network::errors::{LedgerError, NetworkError};
use network::ledger::{Ledger, TransferRequest};
use network::types::{Endpoint, Indexation, MessageId, NodeInfo};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wallet_core::address::to_bech32;
use wallet_core::amount::SendMode;
use wallet_core::derivation::{derive_address, derive_keypair, DerivationPath};
use wallet_core::range::AddressRange;
use wallet_core::types::{AddressRecord, Ed25519Address, Seed};

/// Wallet state for one boot of the console.
///
/// The session is owned by the console context and only mutated between
/// commands: the endpoint and the network prefix change after a successful
/// node handshake, everything else is fixed at creation.
pub struct WalletSession {
    seed: Seed,
    root: DerivationPath,
    endpoint: Endpoint,
    hrp: Option<String>,
    ledger: Arc<dyn Ledger>,
}

impl WalletSession {
    /// Creates a session. The network prefix stays unknown until refreshed.
    pub fn new(seed: Seed, root: DerivationPath, endpoint: Endpoint, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            seed,
            root,
            endpoint,
            hrp: None,
            ledger,
        }
    }

    /// Creates a session from validated configuration.
    pub fn from_config(config: &ValidatedConfig, ledger: Arc<dyn Ledger>) -> Self {
        Self::new(
            config.seed.clone(),
            config.derivation_root.clone(),
            config.endpoint.clone(),
            ledger,
        )
    }

    /// Gets the node endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Gets the derivation root.
    pub fn derivation_root(&self) -> &DerivationPath {
        &self.root
    }

    /// Gets the cached network prefix, if one was fetched.
    pub fn network_prefix(&self) -> Option<&str> {
        self.hrp.as_deref()
    }

    fn active_prefix(&self) -> Result<&str, WalletError> {
        self.network_prefix()
            .ok_or(WalletError::Network(NetworkError::PrefixUnknown))
    }

    /// Derives the raw address at `index`. Needs no network prefix.
    pub fn derive_raw(&self, index: u32) -> Result<Ed25519Address, WalletError> {
        Ok(derive_address(&self.seed, &self.root, index)?)
    }

    /// Derives the address record at `index` under the active prefix.
    pub fn derive_address(&self, index: u32) -> Result<AddressRecord, WalletError> {
        let hrp = self.active_prefix()?;
        let address = self.derive_raw(index)?;
        let bech32 = to_bech32(&address, hrp)?;

        Ok(AddressRecord {
            index,
            address,
            bech32,
        })
    }

    /// Lazily derives the records of `range` in ascending order.
    pub fn addresses(
        &self,
        range: AddressRange,
    ) -> impl Iterator<Item = Result<AddressRecord, WalletError>> + '_ {
        range.into_iter().map(move |index| self.derive_address(index))
    }

    /// Queries the balance of the address at `index`, in base units.
    pub async fn balance(&self, index: u32) -> Result<u64, WalletError> {
        let address = self.derive_raw(index)?;
        let balance = self.ledger.balance(&self.endpoint, &address).await?;
        debug!("Balance of index {}: {}", index, balance);
        Ok(balance)
    }

    /// Lazily pairs the records of `range` with their balances.
    ///
    /// Consumers should stop at the first error; later indices are never
    /// queried unless polled.
    pub fn balances(
        &self,
        range: AddressRange,
    ) -> impl Stream<Item = Result<(AddressRecord, u64), WalletError>> + Send + '_ {
        stream::iter(range).then(move |index| async move {
            let record = self.derive_address(index)?;
            let balance = self
                .ledger
                .balance(&self.endpoint, &record.address)
                .await?;
            Ok::<_, WalletError>((record, balance))
        })
    }

    /// Sends from the address at `sender_index`.
    ///
    /// [`SendMode::Indexation`] submits `message` alone and moves no value;
    /// a transfer attaches `message` to the value transfer when present.
    pub async fn send(
        &self,
        sender_index: u32,
        receiver: Ed25519Address,
        mode: SendMode,
        message: Option<Indexation>,
    ) -> Result<MessageId, WalletError> {
        match mode {
            SendMode::Indexation => {
                let indexation = message.ok_or_else(|| {
                    LedgerError::Transaction("indexation payload without data".to_string())
                })?;
                self.publish(&indexation).await
            }
            SendMode::Transfer(amount) => {
                let path = self.root.child(sender_index)?;
                let signer = derive_keypair(&self.seed, &path)?;
                info!("Sending {} base units from index {}", amount, sender_index);

                let request = TransferRequest {
                    signer: &signer,
                    receiver,
                    amount,
                    indexation: message,
                };
                Ok(self.ledger.send_transfer(&self.endpoint, request).await?)
            }
        }
    }

    /// Submits an indexation payload.
    pub async fn publish(&self, indexation: &Indexation) -> Result<MessageId, WalletError> {
        Ok(self
            .ledger
            .send_indexation(&self.endpoint, indexation)
            .await?)
    }

    /// Fetches the node's status.
    pub async fn node_info(&self) -> Result<NodeInfo, WalletError> {
        Ok(self.ledger.node_info(&self.endpoint).await?)
    }

    /// Re-reads the network prefix from the node.
    ///
    /// On failure the cached prefix is left as it was.
    pub async fn refresh_network_prefix(&mut self) -> Result<String, WalletError> {
        match self.ledger.node_info(&self.endpoint).await {
            Ok(info) => {
                info!("Network prefix: {}", info.bech32_hrp);
                self.hrp = Some(info.bech32_hrp.clone());
                Ok(info.bech32_hrp)
            }
            Err(e) => {
                warn!("Failed to refresh the network prefix: {}", e);
                Err(NetworkError::RefreshFailed(e.to_string()).into())
            }
        }
    }

    /// Moves the session to another node after a successful handshake.
    ///
    /// On failure the endpoint and prefix are left as they were.
    pub async fn switch_endpoint(&mut self, endpoint: Endpoint) -> Result<NodeInfo, WalletError> {
        let info = self
            .ledger
            .node_info(&endpoint)
            .await
            .map_err(|e| NetworkError::RefreshFailed(e.to_string()))?;

        info!("Switching node to {}", endpoint);
        self.endpoint = endpoint;
        self.hrp = Some(info.bech32_hrp.clone());
        Ok(info)
    }
}
