//! Tests for command dispatch.

use crate::support::{self, Call, MockLedger, SharedBuffer, ADDRESS_0_IOTA};
use cli::commands::{dispatch, Context, Dispatch};
use network::bootstrap::NetworkState;
use std::sync::Arc;
use wallet_core::address::to_bech32;

/// `address 0 2` lists three records, the first one the known vector.
#[tokio::test]
async fn test_address_listing() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "address 0 2").await, Dispatch::Status(0));

    let output = out.contents();
    assert!(output.contains("Addr[0]"));
    assert!(output.contains("Addr[1]"));
    assert!(output.contains("Addr[2]"));
    assert!(!output.contains("Addr[3]"));
    assert!(output.contains(ADDRESS_0_IOTA));

    let session = ctx.session.as_ref().unwrap();
    for index in 1..=2 {
        let address = session.derive_raw(index).unwrap();
        assert!(output.contains(&to_bech32(&address, "iota").unwrap()));
    }

    // Deriving touches no ledger after the prefix refresh
    assert_eq!(ledger.calls().len(), 1);
}

/// `balance 5 3` fails without a single ledger query.
#[tokio::test]
async fn test_reversed_balance_range() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "balance 5 3").await, Dispatch::Status(-1));
    assert_eq!(ledger.balance_calls(), 0);
    assert!(out.contents().contains("end index 3 is less than start index 5"));

    assert_eq!(dispatch(&mut ctx, "address 5 3").await, Dispatch::Status(-1));
}

/// `balance 0 1` queries both indices in order.
#[tokio::test]
async fn test_balance_listing() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "balance 0 1").await, Dispatch::Status(0));

    let session = ctx.session.as_ref().unwrap();
    let expected = vec![
        Call::Balance(session.derive_raw(0).unwrap()),
        Call::Balance(session.derive_raw(1).unwrap()),
    ];
    assert_eq!(ledger.calls()[1..].to_vec(), expected);
    assert!(out.contents().contains("1000000i"));
}

/// A failed query mid-listing fails the command.
#[tokio::test]
async fn test_balance_listing_aborts() {
    let ledger = Arc::new(MockLedger::with_prefix("iota").failing_balance_after(1));
    let (mut ctx, _out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "balance 0 4").await, Dispatch::Status(-1));
    assert_eq!(ledger.balance_calls(), 2);
}

/// `send 0 <bech32> 10` transfers 10,000,000 base units.
#[tokio::test]
async fn test_send_value() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    let session = ctx.session.as_ref().unwrap();
    let sender = session.derive_raw(0).unwrap();
    let receiver = session.derive_raw(7).unwrap();
    let receiver_text = to_bech32(&receiver, "iota").unwrap();

    let line = format!("send 0 {} 10", receiver_text);
    assert_eq!(dispatch(&mut ctx, &line).await, Dispatch::Status(0));

    match ledger.calls().last() {
        Some(Call::Transfer {
            sender: from,
            receiver: to,
            amount,
            indexation,
        }) => {
            assert_eq!(*from, sender);
            assert_eq!(*to, receiver);
            assert_eq!(*amount, 10_000_000);
            let indexation = indexation.as_ref().unwrap();
            assert_eq!(indexation.index, b"Wallet Console".to_vec());
        }
        other => panic!("expected a transfer, got {:?}", other),
    }

    let output = out.contents();
    assert!(output.contains(&format!("send 10Mi to {}", receiver_text)));
    assert!(output.contains(&"cd".repeat(32)));
}

/// Amount 0 switches to an indexation message carrying the given text.
#[tokio::test]
async fn test_send_indexation() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    let receiver = ctx.session.as_ref().unwrap().derive_raw(1).unwrap().to_hex();
    let line = format!("send 0 {} 0 \"hello ledger\"", receiver);
    assert_eq!(dispatch(&mut ctx, &line).await, Dispatch::Status(0));

    match ledger.calls().last() {
        Some(Call::Indexation(indexation)) => {
            assert_eq!(indexation.data, b"hello ledger".to_vec());
        }
        other => panic!("expected an indexation, got {:?}", other),
    }
    assert!(out.contents().contains("send indexation payload"));
}

/// A malformed receiver fails before conversion or any ledger call.
#[tokio::test]
async fn test_send_bad_receiver() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;
    let calls_before = ledger.calls().len();

    assert_eq!(
        dispatch(&mut ctx, "send 0 xyz123notanaddress 0").await,
        Dispatch::Status(-1)
    );
    assert_eq!(ledger.calls().len(), calls_before);
    assert!(out.contents().contains("Invalid receiver address"));

    // Testnet address on a mainnet session
    let address = ctx.session.as_ref().unwrap().derive_raw(0).unwrap();
    let testnet = to_bech32(&address, "atoi").unwrap();
    assert_eq!(
        dispatch(&mut ctx, &format!("send 0 {} 1", testnet)).await,
        Dispatch::Status(-1)
    );
    assert_eq!(ledger.calls().len(), calls_before);
}

/// An amount that overflows base units is rejected before any ledger call.
#[tokio::test]
async fn test_send_overflow() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, _out) = support::connected_context(ledger.clone()).await;
    let calls_before = ledger.calls().len();

    let line = format!("send 0 {} {}", "00".repeat(32), u64::MAX);
    assert_eq!(dispatch(&mut ctx, &line).await, Dispatch::Status(-1));
    assert_eq!(ledger.calls().len(), calls_before);
}

/// Ledger failures are reported and leave the session usable.
#[tokio::test]
async fn test_ledger_error_keeps_session() {
    let ledger = Arc::new(MockLedger::with_prefix("iota").failing_sends());
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    let line = format!("send 0 {} 5", "00".repeat(32));
    assert_eq!(dispatch(&mut ctx, &line).await, Dispatch::Status(-1));
    assert!(out.contents().contains("Insufficient balance"));

    assert_eq!(dispatch(&mut ctx, "address 0 0").await, Dispatch::Status(0));
}

/// Malformed arguments never reach a handler.
#[tokio::test]
async fn test_usage_errors_have_no_side_effects() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;
    let calls_before = ledger.calls().len();

    for line in [
        "balance 0",
        "balance 0 x",
        "balance 0 1 2",
        "send 0 abc",
        "send 0 abc 1.5",
        "send -1 abc 1",
        "node_info extra",
        "node_info_set http://localhost 99999",
        "sensor",
        "sensor 1 1 1",
        "send 0 \"unterminated 1",
    ] {
        assert_eq!(dispatch(&mut ctx, line).await, Dispatch::Status(-1), "{}", line);
    }

    assert_eq!(ledger.calls().len(), calls_before);
    assert!(out
        .contents()
        .contains("Usage: send <index> <receiver> <amount> [<message>]"));
}

/// Unknown commands and blank lines.
#[tokio::test]
async fn test_unknown_and_blank() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger).await;

    assert_eq!(dispatch(&mut ctx, "   ").await, Dispatch::Empty);
    assert_eq!(dispatch(&mut ctx, "transfer 1").await, Dispatch::Status(-1));
    assert!(out.contents().contains("unknown command transfer"));
}

/// Ledger commands are gated on the network; diagnostics are not.
#[tokio::test]
async fn test_gating() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let out = SharedBuffer::default();
    let mut ctx = Context::new(Box::new(out.clone()))
        .with_session(support::session(ledger.clone()), NetworkState::Failed);

    assert_eq!(dispatch(&mut ctx, "balance 0 1").await, Dispatch::Status(-1));
    assert_eq!(dispatch(&mut ctx, "node_info").await, Dispatch::Status(-1));
    assert!(ledger.calls().is_empty());
    assert!(out.contents().contains("Network is not connected (failed)"));

    assert_eq!(dispatch(&mut ctx, "version").await, Dispatch::Status(0));
    assert_eq!(dispatch(&mut ctx, "help").await, Dispatch::Status(0));
    assert_eq!(dispatch(&mut ctx, "restart").await, Dispatch::Restart);
}

/// Without a session only diagnostics work.
#[tokio::test]
async fn test_no_session() {
    let out = SharedBuffer::default();
    let mut ctx = Context::new(Box::new(out.clone()));
    ctx.network = NetworkState::Connected;

    assert_eq!(dispatch(&mut ctx, "address 0 1").await, Dispatch::Status(-1));
    assert!(out.contents().contains("Wallet session unavailable"));
    assert_eq!(dispatch(&mut ctx, "version").await, Dispatch::Status(0));
}

/// `help` lists every registered command.
#[tokio::test]
async fn test_help_lists_commands() {
    let out = SharedBuffer::default();
    let mut ctx = Context::new(Box::new(out.clone()));

    assert_eq!(dispatch(&mut ctx, "help").await, Dispatch::Status(0));
    let output = out.contents();
    for command in cli::COMMANDS {
        assert!(output.contains(command.name), "{}", command.name);
    }
}

/// `node_info` prints the node's status; a node error fails the command.
#[tokio::test]
async fn test_node_info() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "node_info").await, Dispatch::Status(0));
    assert!(out.contents().contains("bech32HRP: iota"));

    ledger.set_prefix(None);
    assert_eq!(dispatch(&mut ctx, "node_info").await, Dispatch::Status(-1));
}

/// `node_info_set` moves the session only after the node answered.
#[tokio::test]
async fn test_node_info_set() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, _out) = support::connected_context(ledger.clone()).await;

    assert_eq!(
        dispatch(&mut ctx, "node_info_set not-a-url 443").await,
        Dispatch::Status(-1)
    );

    ledger.set_prefix(None);
    assert_eq!(
        dispatch(&mut ctx, "node_info_set https://node.example.com 443").await,
        Dispatch::Status(-1)
    );
    let session = ctx.session.as_ref().unwrap();
    assert_eq!(session.endpoint(), &support::endpoint());
    assert_eq!(session.network_prefix(), Some("iota"));

    ledger.set_prefix(Some("atoi"));
    assert_eq!(
        dispatch(&mut ctx, "node_info_set https://node.example.com 443").await,
        Dispatch::Status(0)
    );
    let session = ctx.session.as_ref().unwrap();
    assert_eq!(session.endpoint().host, "node.example.com");
    assert_eq!(session.network_prefix(), Some("atoi"));
}

/// `sensor` publishes every reading and fails if any iteration did.
#[tokio::test]
async fn test_sensor() {
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (mut ctx, _out) = support::connected_context(ledger.clone()).await;

    assert_eq!(dispatch(&mut ctx, "sensor 3 0").await, Dispatch::Status(0));
    let readings: Vec<_> = ledger
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Indexation(indexation) => Some(indexation),
            _ => None,
        })
        .collect();
    assert_eq!(readings.len(), 3);

    let reading: serde_json::Value = serde_json::from_slice(&readings[0].data).unwrap();
    assert_eq!(reading["device"], "wallet-console");
    assert!(reading["temperature"].is_number());
    assert!(reading["timestamp"].as_u64().is_some());

    let failing = Arc::new(MockLedger::with_prefix("iota").failing_sends());
    let (mut ctx, _out) = support::connected_context(failing.clone()).await;
    assert_eq!(dispatch(&mut ctx, "sensor 2 0").await, Dispatch::Status(-1));
    // Both iterations ran
    assert_eq!(failing.calls().len(), 3);
}
