//! Core primitives for the wallet console.
//!
//! This crate holds the pure domain logic of the console: seeds and key
//! derivation, Ed25519 addresses and their bech32 form, receiver resolution,
//! unit conversion and index ranges. Nothing here performs I/O.

pub mod address;
pub mod amount;
pub mod derivation;
pub mod errors;
pub mod range;
pub mod receiver;
pub mod types;

// Re-export commonly used types
pub use address::{from_bech32, to_bech32};
pub use amount::{send_mode, to_base_units, SendMode};
pub use derivation::{derive_address, derive_keypair, DerivationPath, DEFAULT_DERIVATION_ROOT};
pub use errors::{
    AddressFormatError, ConfigError, CoreError, DerivationError, RangeError, ValueRangeError,
};
pub use range::AddressRange;
pub use receiver::{classify, resolve_receiver, ReceiverFormat};
pub use types::{AddressRecord, Ed25519Address, Seed};
