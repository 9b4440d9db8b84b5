//! Resolution of user supplied receiver addresses.
//!
//! A receiver is accepted in exactly two forms:
//!
//! 1. bech32, recognised by one of the network prefixes in [`KNOWN_HRPS`] and
//!    decoded against the session's active prefix;
//! 2. raw hex of the 32-byte Ed25519 address, without any prefix.
//!
//! Anything else is rejected before any decoding is attempted.

use crate::address::from_bech32;
use crate::errors::AddressFormatError;
use crate::types::{Ed25519Address, ED25519_ADDRESS_BYTES, ED25519_ADDRESS_HEX_LEN, KNOWN_HRPS};
use log::debug;

/// The encoding a receiver string was recognised as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverFormat {
    /// Starts with a known network prefix
    Bech32,
    /// Exactly the hex length of an Ed25519 address
    RawHex,
    /// Neither of the above
    Invalid,
}

/// Classifies a receiver string without decoding it.
///
/// Prefixes match in either case, since bech32 allows all-uppercase strings.
pub fn classify(input: &str) -> ReceiverFormat {
    let has_prefix = |hrp: &&str| {
        input
            .get(..hrp.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(hrp))
    };
    if KNOWN_HRPS.iter().any(has_prefix) {
        ReceiverFormat::Bech32
    } else if input.len() == ED25519_ADDRESS_HEX_LEN {
        ReceiverFormat::RawHex
    } else {
        ReceiverFormat::Invalid
    }
}

/// Resolves a receiver string into a raw Ed25519 address.
///
/// `active_hrp` is the session's current network prefix; a bech32 receiver
/// carrying any other prefix is rejected rather than reinterpreted.
pub fn resolve_receiver(
    input: &str,
    active_hrp: Option<&str>,
) -> Result<Ed25519Address, AddressFormatError> {
    match classify(input) {
        ReceiverFormat::Bech32 => {
            let hrp = active_hrp
                .ok_or_else(|| AddressFormatError::UnknownNetworkPrefix(input.to_string()))?;
            debug!("Decoding bech32 receiver against prefix {}", hrp);
            from_bech32(input, hrp)
        }
        ReceiverFormat::RawHex => {
            let mut address = [0u8; ED25519_ADDRESS_BYTES];
            hex::decode_to_slice(input, &mut address)?;
            Ok(Ed25519Address(address))
        }
        ReceiverFormat::Invalid => Err(AddressFormatError::Unrecognized(input.to_string())),
    }
}
