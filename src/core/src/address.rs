//! Bech32 encoding of wallet addresses.

use crate::errors::AddressFormatError;
use crate::types::{Ed25519Address, ADDRESS_BYTES, ADDRESS_VERSION_ED25519, ED25519_ADDRESS_BYTES};
use bech32::{FromBase32, ToBase32, Variant};

/// Encodes an address under the given human-readable prefix.
pub fn to_bech32(address: &Ed25519Address, hrp: &str) -> Result<String, AddressFormatError> {
    let versioned = address.to_versioned();
    Ok(bech32::encode(hrp, versioned.to_base32(), Variant::Bech32)?)
}

/// Decodes a bech32 address, requiring its prefix to equal `expected_hrp`.
///
/// Codec failures (checksum, characters, padding) are returned as
/// [`AddressFormatError::Bech32`] unchanged.
pub fn from_bech32(encoded: &str, expected_hrp: &str) -> Result<Ed25519Address, AddressFormatError> {
    let (hrp, data, variant) = bech32::decode(encoded)?;
    if variant != Variant::Bech32 {
        return Err(AddressFormatError::Bech32(bech32::Error::InvalidChecksum));
    }
    if !hrp.eq_ignore_ascii_case(expected_hrp) {
        return Err(AddressFormatError::PrefixMismatch {
            expected: expected_hrp.to_string(),
            found: hrp,
        });
    }

    let payload = Vec::<u8>::from_base32(&data)?;
    if payload.len() != ADDRESS_BYTES {
        return Err(AddressFormatError::InvalidPayload(format!(
            "expected {} bytes, got {}",
            ADDRESS_BYTES,
            payload.len()
        )));
    }
    if payload[0] != ADDRESS_VERSION_ED25519 {
        return Err(AddressFormatError::InvalidPayload(format!(
            "unsupported address version {}",
            payload[0]
        )));
    }

    let mut address = [0u8; ED25519_ADDRESS_BYTES];
    address.copy_from_slice(&payload[1..]);
    Ok(Ed25519Address(address))
}
