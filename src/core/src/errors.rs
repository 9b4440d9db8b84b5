//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while validating the boot configuration.
///
/// These are fatal at startup: no wallet session is created when one occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The node endpoint is not a well-formed URL with a scheme and a host.
    #[error("Invalid node endpoint {url}: {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The seed is neither the random sentinel nor 64 characters long.
    #[error("Seed length is {0}, should be 64")]
    InvalidSeedLength(usize),

    /// The seed has the right length but is not hexadecimal.
    #[error("Seed is not a hex string: {0}")]
    InvalidSeedHex(String),

    /// The derivation root path cannot be parsed.
    #[error("Invalid derivation path {path}: {reason}")]
    InvalidDerivationPath {
        /// The path as configured
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The maximum connection retry count must allow at least one attempt.
    #[error("Maximum connection retries must be at least 1, got {0}")]
    InvalidRetryLimit(u32),

    /// The message index is empty or longer than an indexation payload allows.
    #[error("Message index length is {0}, should be between 1 and 64 bytes")]
    InvalidMessageIndex(usize),
}

/// Error when an index range is empty because the end precedes the start.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid address range: end index {end} is less than start index {start}")]
pub struct RangeError {
    /// The requested start index
    pub start: u32,
    /// The requested end index
    pub end: u32,
}

/// Errors raised while resolving a receiver address.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressFormatError {
    /// The input matches neither the prefixed nor the raw hex form.
    #[error("Invalid receiver address: {0}")]
    Unrecognized(String),

    /// The bech32 codec rejected the input (bad checksum, bad characters, ...).
    #[error("Invalid bech32 address: {0}")]
    Bech32(#[from] bech32::Error),

    /// The embedded prefix differs from the session's active network prefix.
    #[error("Address prefix {found} does not match the active network prefix {expected}")]
    PrefixMismatch {
        /// The active network prefix
        expected: String,
        /// The prefix found in the address
        found: String,
    },

    /// A prefixed address was given but no network prefix is known yet.
    #[error("Network prefix is unknown, cannot decode {0}")]
    UnknownNetworkPrefix(String),

    /// The decoded payload is not a versioned Ed25519 address.
    #[error("Unsupported address payload: {0}")]
    InvalidPayload(String),

    /// The raw form has the right length but contains non-hex characters.
    #[error("Invalid ed25519 address: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Error when a display amount cannot be represented in base units.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Amount {0} is too large to convert to base units")]
pub struct ValueRangeError(pub u64);

/// Errors raised while deriving keys from a seed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// The key material could not be turned into an ed25519 key.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// The derivation path could not be parsed.
    #[error("Invalid derivation path {path}: {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The child index does not fit in the hardened index space.
    #[error("Index {0} is out of the hardened index range")]
    IndexOutOfRange(u32),
}

/// Umbrella error for every fallible operation of the core crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Configuration validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An index range was invalid.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// A receiver address could not be resolved.
    #[error(transparent)]
    AddressFormat(#[from] AddressFormatError),

    /// An amount could not be converted.
    #[error(transparent)]
    ValueRange(#[from] ValueRangeError),

    /// Key derivation failed.
    #[error(transparent)]
    Derivation(#[from] DerivationError),
}
