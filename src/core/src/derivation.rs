//! SLIP-10 ed25519 key derivation.
//!
//! Every wallet address is derived from the seed along a hardened path made of
//! the configured root followed by the address index, e.g.
//! `m/44'/4218'/0'/0'/7'`. Ed25519 only supports hardened derivation, so every
//! segment of the root must carry the `'` marker.

use crate::errors::DerivationError;
use crate::types::{Ed25519Address, Seed};
use ed25519_dalek::{Keypair, PublicKey, SecretKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;

/// Offset of the hardened index space.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Default derivation root for wallet addresses.
pub const DEFAULT_DERIVATION_ROOT: &str = "m/44'/4218'/0'/0'";

const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

type HmacSha512 = Hmac<Sha512>;

/// A hardened-only derivation path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationPath {
    segments: Vec<u32>,
}

impl DerivationPath {
    /// Returns the path segments without the hardened offset.
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Returns a new path with `index` appended as a hardened segment.
    pub fn child(&self, index: u32) -> Result<Self, DerivationError> {
        if index >= HARDENED_OFFSET {
            return Err(DerivationError::IndexOutOfRange(index));
        }
        let mut segments = self.segments.clone();
        segments.push(index);
        Ok(Self { segments })
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DerivationError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(invalid("path must start with 'm'"));
        }

        let mut segments = Vec::new();
        for part in parts {
            let digits = part
                .strip_suffix('\'')
                .ok_or_else(|| invalid("every segment must be hardened"))?;
            let index: u32 = digits
                .parse()
                .map_err(|_| invalid("segment is not a number"))?;
            if index >= HARDENED_OFFSET {
                return Err(invalid("segment is out of range"));
            }
            segments.push(index);
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{}'", segment)?;
        }
        Ok(())
    }
}

/// Derives the ed25519 keypair at `path` from `seed`.
pub fn derive_keypair(seed: &Seed, path: &DerivationPath) -> Result<Keypair, DerivationError> {
    let (mut key, mut chain_code) = hmac_split(ED25519_CURVE_KEY, &[seed.as_bytes()])?;

    for segment in path.segments() {
        let hardened = (segment | HARDENED_OFFSET).to_be_bytes();
        let (child_key, child_chain) = hmac_split(&chain_code, &[&[0u8], &key, &hardened])?;
        key = child_key;
        chain_code = child_chain;
    }

    let secret =
        SecretKey::from_bytes(&key).map_err(|e| DerivationError::InvalidKey(e.to_string()))?;
    let public = PublicKey::from(&secret);
    Ok(Keypair { secret, public })
}

/// Derives the address at `index` below the derivation `root`.
pub fn derive_address(
    seed: &Seed,
    root: &DerivationPath,
    index: u32,
) -> Result<Ed25519Address, DerivationError> {
    let keypair = derive_keypair(seed, &root.child(index)?)?;
    Ok(Ed25519Address::from_public_key(&keypair.public))
}

fn hmac_split(key: &[u8], data: &[&[u8]]) -> Result<([u8; 32], [u8; 32]), DerivationError> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| DerivationError::InvalidKey(e.to_string()))?;
    for chunk in data {
        mac.update(chunk);
    }
    let output = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    Ok((left, right))
}
