//! Tests for the core crate.

use crate::support::{ADDRESS_0_HEX, ADDRESS_0_IOTA, SEED_HEX};
use rand::Rng;
use wallet_core::{
    address::to_bech32,
    amount::{send_mode, to_base_units, SendMode},
    derivation::{derive_address, DerivationPath, DEFAULT_DERIVATION_ROOT},
    errors::{AddressFormatError, RangeError, ValueRangeError},
    range::AddressRange,
    receiver::resolve_receiver,
    types::{Seed, MAINNET_HRP, TESTNET_HRP},
};

fn root() -> DerivationPath {
    DEFAULT_DERIVATION_ROOT.parse().unwrap()
}

/// Tests that derivation is deterministic and matches the known vector.
#[test]
fn test_derivation_is_deterministic() {
    let seed = Seed::from_config(SEED_HEX).unwrap();

    let first = derive_address(&seed, &root(), 0).unwrap();
    let second = derive_address(&seed, &root(), 0).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_hex(), ADDRESS_0_HEX);
    assert_eq!(to_bech32(&first, MAINNET_HRP).unwrap(), ADDRESS_0_IOTA);

    // Different indices give different addresses
    let other = derive_address(&seed, &root(), 1).unwrap();
    assert_ne!(first, other);
}

/// Tests that both receiver forms of one key resolve to the same bytes.
#[test]
fn test_receiver_forms_agree() {
    let seed = Seed::random();
    for index in 0..5 {
        let address = derive_address(&seed, &root(), index).unwrap();

        for hrp in [MAINNET_HRP, TESTNET_HRP] {
            let encoded = to_bech32(&address, hrp).unwrap();
            let from_bech32 = resolve_receiver(&encoded, Some(hrp)).unwrap();
            let from_hex = resolve_receiver(&address.to_hex(), Some(hrp)).unwrap();
            assert_eq!(from_bech32, from_hex);
            assert_eq!(from_bech32, address);
        }
    }
}

/// Tests that the active prefix decides, never the embedded one.
#[test]
fn test_receiver_prefix_mismatch() {
    let result = resolve_receiver(ADDRESS_0_IOTA, Some(TESTNET_HRP));
    assert!(matches!(result, Err(AddressFormatError::PrefixMismatch { .. })));
}

/// Tests that wrong-length hex and garbage are rejected without decoding.
#[test]
fn test_receiver_rejects_malformed() {
    // Valid hex, wrong length
    assert!(matches!(
        resolve_receiver(&ADDRESS_0_HEX[..62], Some(MAINNET_HRP)),
        Err(AddressFormatError::Unrecognized(_))
    ));
    assert!(matches!(
        resolve_receiver(&format!("{}00", ADDRESS_0_HEX), Some(MAINNET_HRP)),
        Err(AddressFormatError::Unrecognized(_))
    ));
    // Right length, not hex
    assert!(matches!(
        resolve_receiver(&"g".repeat(64), Some(MAINNET_HRP)),
        Err(AddressFormatError::Hex(_))
    ));
}

/// Tests range iteration over random bounds.
#[test]
fn test_range_properties() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let start: u32 = rng.gen_range(0..10_000);
        let end: u32 = rng.gen_range(0..10_000);

        match AddressRange::new(start, end) {
            Ok(range) => {
                assert!(start <= end);
                let indices: Vec<u32> = range.into_iter().collect();
                assert_eq!(indices.len() as u64, u64::from(end - start) + 1);
                assert!(indices.windows(2).all(|pair| pair[0] + 1 == pair[1]));
                assert_eq!(indices.first(), Some(&start));
                assert_eq!(indices.last(), Some(&end));
            }
            Err(e) => {
                assert!(end < start);
                assert_eq!(e, RangeError { start, end });
            }
        }
    }
}

/// Tests the unit conversion and its mode switch.
#[test]
fn test_value_conversion() {
    assert_eq!(send_mode(0).unwrap(), SendMode::Indexation);

    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let display: u64 = rng.gen_range(1..=u64::MAX / 1_000_000);
        assert_eq!(send_mode(display).unwrap(), SendMode::Transfer(display * 1_000_000));
    }

    let too_large = u64::MAX / 1_000_000 + 1;
    assert_eq!(to_base_units(too_large).unwrap_err(), ValueRangeError(too_large));
}
