//! Tests for the wallet session.

use crate::support::{self, Call, MockLedger, ADDRESS_0_HEX, ADDRESS_0_IOTA};
use cli::errors::WalletError;
use futures::StreamExt;
use network::errors::NetworkError;
use network::types::{Endpoint, Indexation};
use std::sync::Arc;
use tokio::runtime::Runtime;
use wallet_core::amount::SendMode;
use wallet_core::range::AddressRange;

/// Tests that addresses need the network prefix and then match the vector.
#[test]
fn test_derive_address_needs_prefix() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let ledger = Arc::new(MockLedger::with_prefix("iota"));
        let mut session = support::session(ledger.clone());

        assert!(matches!(
            session.derive_address(0),
            Err(WalletError::Network(NetworkError::PrefixUnknown))
        ));
        // The raw form needs no prefix
        assert_eq!(session.derive_raw(0).unwrap().to_hex(), ADDRESS_0_HEX);

        assert_eq!(session.refresh_network_prefix().await.unwrap(), "iota");
        let record = session.derive_address(0).unwrap();
        assert_eq!(record.index, 0);
        assert_eq!(record.bech32, ADDRESS_0_IOTA);
        assert_eq!(record.raw()[0], 0);
        assert_eq!(&record.raw()[1..], record.address.as_bytes());
    });
}

/// Tests that a failed refresh keeps the cached prefix.
#[test]
fn test_refresh_failure_keeps_prefix() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let ledger = Arc::new(MockLedger::with_prefix("atoi"));
        let mut session = support::session(ledger.clone());
        session.refresh_network_prefix().await.unwrap();

        ledger.set_prefix(None);
        let result = session.refresh_network_prefix().await;
        assert!(matches!(
            result,
            Err(WalletError::Network(NetworkError::RefreshFailed(_)))
        ));
        assert_eq!(session.network_prefix(), Some("atoi"));

        // Never set means never guessed
        let fresh = support::session(ledger);
        assert_eq!(fresh.network_prefix(), None);
    });
}

/// Tests that switching nodes only happens after a handshake.
#[tokio::test]
async fn test_switch_endpoint() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let mut session = support::session(ledger.clone());
    let other = Endpoint::parse("https://node.example.com", None).unwrap();

    ledger.set_prefix(None);
    assert!(session.switch_endpoint(other.clone()).await.is_err());
    assert_eq!(session.endpoint(), &support::endpoint());
    assert_eq!(session.network_prefix(), None);

    ledger.set_prefix(Some("atoi"));
    let info = session.switch_endpoint(other.clone()).await.unwrap();
    assert_eq!(info.bech32_hrp, "atoi");
    assert_eq!(session.endpoint(), &other);
    assert_eq!(session.network_prefix(), Some("atoi"));
    assert_eq!(ledger.calls().last(), Some(&Call::NodeInfo(other)));
}

/// Tests that a failed balance query stops the listing.
#[tokio::test]
async fn test_balances_stop_at_first_error() {
    let ledger = Arc::new(MockLedger::with_prefix("iota").failing_balance_after(2));
    let mut session = support::session(ledger.clone());
    session.refresh_network_prefix().await.unwrap();

    let range = AddressRange::new(0, 9).unwrap();
    let mut balances = Box::pin(session.balances(range));
    let mut seen = Vec::new();
    let mut failure = None;
    while let Some(entry) = balances.next().await {
        match entry {
            Ok((record, _)) => seen.push(record.index),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    assert_eq!(seen, vec![0, 1]);
    assert!(matches!(failure, Some(WalletError::Ledger(_))));
    assert_eq!(ledger.balance_calls(), 3);
}

/// Tests both send paths.
#[tokio::test]
async fn test_send_modes() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let session = support::session(ledger.clone());
    let receiver = session.derive_raw(1).unwrap();
    let message = Indexation::new("Wallet Console", "hello");

    session
        .send(0, receiver, SendMode::Indexation, Some(message.clone()))
        .await
        .unwrap();
    session
        .send(0, receiver, SendMode::Transfer(5_000_000), Some(message.clone()))
        .await
        .unwrap();

    let sender = session.derive_raw(0).unwrap();
    assert_eq!(
        ledger.calls(),
        vec![
            Call::Indexation(message.clone()),
            Call::Transfer {
                sender,
                receiver,
                amount: 5_000_000,
                indexation: Some(message),
            },
        ]
    );

    // Indexation needs data
    assert!(session
        .send(0, receiver, SendMode::Indexation, None)
        .await
        .is_err());
}
