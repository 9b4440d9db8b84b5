//! HTTP client for the node REST API.

use crate::errors::LedgerError;
use crate::ledger::{Ledger, TransferRequest};
use crate::transaction::{Essence, SignatureLockedOutput, UtxoInput, TRANSACTION_ID_BYTES};
use crate::types::{
    AddressBalance, AddressOutputs, DataEnvelope, Endpoint, ErrorBody, Indexation, MessageId,
    NodeInfo, OutputResponse, SubmittedMessage, Tips,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use wallet_core::types::Ed25519Address;

const API_PREFIX: &str = "/api/v1";

/// A ledger backed by a node's REST API.
#[derive(Clone, Debug)]
pub struct NodeClient {
    http: reqwest::Client,
}

impl NodeClient {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    fn url(endpoint: &Endpoint, path: &str) -> String {
        format!("{}{}{}", endpoint.base_url(), API_PREFIX, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: &str,
    ) -> Result<T, LedgerError> {
        let url = Self::url(endpoint, path);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let text = response.text().await?;
        parse_response(&text)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, LedgerError> {
        let url = Self::url(endpoint, path);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;
        let text = response.text().await?;
        parse_response(&text)
    }

    async fn submit(
        &self,
        endpoint: &Endpoint,
        payload: serde_json::Value,
    ) -> Result<MessageId, LedgerError> {
        let tips: Tips = self.get_json(endpoint, "/tips").await?;
        let message = serde_json::json!({
            "parentMessageIds": tips.tip_message_ids,
            "payload": payload,
            "nonce": "",
        });

        let submitted: SubmittedMessage = self.post_json(endpoint, "/messages", &message).await?;
        info!("Message submitted: {}", submitted.message_id);
        Ok(MessageId(submitted.message_id))
    }

    /// Collects unspent outputs of `address` until `amount` is covered.
    async fn collect_inputs(
        &self,
        endpoint: &Endpoint,
        address: &Ed25519Address,
        amount: u64,
    ) -> Result<(Vec<UtxoInput>, u64), LedgerError> {
        let path = format!("/addresses/ed25519/{}/outputs", address.to_hex());
        let outputs: AddressOutputs = self.get_json(endpoint, &path).await?;

        let mut inputs = Vec::new();
        let mut total: u64 = 0;
        for output_id in outputs.output_ids {
            if total >= amount {
                break;
            }

            let output: OutputResponse = self
                .get_json(endpoint, &format!("/outputs/{}", output_id))
                .await?;
            if output.is_spent {
                continue;
            }

            inputs.push(UtxoInput {
                transaction_id: parse_transaction_id(&output.transaction_id)?,
                output_index: output.output_index,
            });
            total = total.saturating_add(output.output.amount);
        }

        if total < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: total,
            });
        }
        Ok((inputs, total))
    }
}

#[async_trait]
impl Ledger for NodeClient {
    async fn node_info(&self, endpoint: &Endpoint) -> Result<NodeInfo, LedgerError> {
        self.get_json(endpoint, "/info").await
    }

    async fn balance(
        &self,
        endpoint: &Endpoint,
        address: &Ed25519Address,
    ) -> Result<u64, LedgerError> {
        let path = format!("/addresses/ed25519/{}", address.to_hex());
        let balance: AddressBalance = self.get_json(endpoint, &path).await?;
        Ok(balance.balance)
    }

    async fn send_indexation(
        &self,
        endpoint: &Endpoint,
        indexation: &Indexation,
    ) -> Result<MessageId, LedgerError> {
        self.submit(endpoint, indexation.to_json()).await
    }

    async fn send_transfer(
        &self,
        endpoint: &Endpoint,
        request: TransferRequest<'_>,
    ) -> Result<MessageId, LedgerError> {
        let sender = Ed25519Address::from_public_key(&request.signer.public);
        let (inputs, total) = self
            .collect_inputs(endpoint, &sender, request.amount)
            .await?;

        let mut outputs = vec![SignatureLockedOutput {
            address: request.receiver,
            amount: request.amount,
        }];
        let remainder = total - request.amount;
        if remainder > 0 {
            outputs.push(SignatureLockedOutput {
                address: sender,
                amount: remainder,
            });
        }

        let essence = Essence::new(inputs, outputs, request.indexation)?;
        let payload = essence.sign(request.signer);
        self.submit(endpoint, payload).await
    }
}

/// Unwraps a node response, surfacing the node's error body if present.
fn parse_response<T: DeserializeOwned>(text: &str) -> Result<T, LedgerError> {
    if text.is_empty() {
        return Err(LedgerError::InvalidResponse(
            "Empty response from node".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    if let Some(error) = value.get("error") {
        if !error.is_null() {
            let body: ErrorBody = serde_json::from_value(error.clone())?;
            return Err(LedgerError::Node {
                code: body.code,
                message: body.message,
            });
        }
    }

    let envelope: DataEnvelope<T> = serde_json::from_value(value)?;
    Ok(envelope.data)
}

fn parse_transaction_id(id: &str) -> Result<[u8; TRANSACTION_ID_BYTES], LedgerError> {
    let mut bytes = [0u8; TRANSACTION_ID_BYTES];
    hex::decode_to_slice(id, &mut bytes)
        .map_err(|e| LedgerError::InvalidResponse(format!("transaction id {}: {}", id, e)))?;
    Ok(bytes)
}
