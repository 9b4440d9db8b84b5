//! Node API types for the wallet console.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use wallet_core::errors::ConfigError;

/// Where the node lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or IP address of the node
    pub host: String,
    /// TCP port of the node API
    pub port: u16,
    /// Whether the node is reached over TLS
    pub use_tls: bool,
}

impl Endpoint {
    /// Parses a node URL, overriding its port with `port` when one is given.
    ///
    /// The URL must carry an `http` or `https` scheme and a host.
    pub fn parse(url: &str, port: Option<u16>) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        let use_tls = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(invalid(format!("unsupported scheme {}", other))),
        };
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();
        let port = port
            .filter(|port| *port != 0)
            .or_else(|| parsed.port_or_known_default())
            .ok_or_else(|| invalid("missing port".to_string()))?;

        Ok(Self { host, port, use_tls })
    }

    /// Returns the base URL of the node API, without a trailing slash.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Returns the `host:port` pair used for connectivity probes.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Node status as reported by the node info endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    /// Node software name
    pub name: String,
    /// Node software version
    pub version: String,
    /// Whether the node considers itself synced
    pub is_healthy: bool,
    /// Network identifier
    pub network_id: String,
    /// Address prefix of the network
    #[serde(rename = "bech32HRP")]
    pub bech32_hrp: String,
    /// Minimum proof-of-work score
    #[serde(rename = "minPoWScore", default)]
    pub min_pow_score: f64,
    /// Messages per second
    #[serde(default)]
    pub messages_per_second: f64,
    /// Referenced messages per second
    #[serde(default)]
    pub referenced_messages_per_second: f64,
    /// Referenced rate in percent
    #[serde(default)]
    pub referenced_rate: f64,
    /// Timestamp of the latest milestone
    #[serde(default)]
    pub latest_milestone_timestamp: u64,
    /// Index of the latest milestone
    #[serde(default)]
    pub latest_milestone_index: u32,
    /// Index of the confirmed milestone
    #[serde(default)]
    pub confirmed_milestone_index: u32,
    /// Index up to which the node pruned
    #[serde(default)]
    pub pruning_index: u32,
    /// Optional node features
    #[serde(default)]
    pub features: Vec<String>,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "isHealthy: {}", self.is_healthy)?;
        writeln!(f, "Network ID: {}", self.network_id)?;
        writeln!(f, "bech32HRP: {}", self.bech32_hrp)?;
        writeln!(f, "minPoWScore: {}", self.min_pow_score)?;
        writeln!(f, "Latest Milestone Index: {}", self.latest_milestone_index)?;
        writeln!(f, "Latest Milestone Timestamp: {}", self.latest_milestone_timestamp)?;
        writeln!(f, "Confirmed Milestone Index: {}", self.confirmed_milestone_index)?;
        writeln!(f, "Pruning Index: {}", self.pruning_index)?;
        writeln!(f, "MPS: {:.2}", self.messages_per_second)?;
        writeln!(f, "Referenced MPS: {:.2}", self.referenced_messages_per_second)?;
        write!(f, "Reference Rate: {:.2}%", self.referenced_rate)
    }
}

/// Data attached to a message under an index, without moving value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Indexation {
    /// The index the data can be looked up by
    pub index: Vec<u8>,
    /// The attached data
    pub data: Vec<u8>,
}

impl Indexation {
    /// Creates an indexation payload.
    pub fn new(index: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            index: index.into(),
            data: data.into(),
        }
    }

    /// Returns the payload in the node's JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": 2,
            "index": hex::encode(&self.index),
            "data": hex::encode(&self.data),
        })
    }
}

/// Identifier of a message accepted by the node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful node responses wrap their payload in `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Failed node responses carry an `error` object.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressBalance {
    pub balance: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressOutputs {
    #[serde(default)]
    pub output_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OutputResponse {
    pub transaction_id: String,
    pub output_index: u16,
    pub is_spent: bool,
    pub output: OutputBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputBody {
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Tips {
    pub tip_message_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmittedMessage {
    pub message_id: String,
}
