//! Tests for the network bootstrap and the boot sequence.

use crate::support::{MockLedger, ScriptedDriver, SharedBuffer, SEED_HEX};
use cli::commands::{dispatch, Dispatch};
use cli::config::WalletConfig;
use cli::console::{self, boot_with, Exit};
use network::bootstrap::{spawn_bootstrap, NetworkState};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

fn config(max_retries: u32) -> WalletConfig {
    WalletConfig {
        node_url: "http://127.0.0.1".to_string(),
        node_port: 14265,
        seed: SEED_HEX.to_string(),
        max_retries,
        retry_delay_millis: 0,
        ..WalletConfig::default()
    }
}

/// Three failures with a budget of three end in Failed, with no fourth try.
#[test]
fn test_bootstrap_gives_up() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (driver, attempts) = ScriptedDriver::new(vec![false, false, false, true]);
        let (mut monitor, handle) = spawn_bootstrap(driver, 3);

        assert_eq!(monitor.wait_terminal().await, NetworkState::Failed);
        handle.await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    });
}

/// A success within the budget ends in Connected.
#[test]
fn test_bootstrap_recovers() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (driver, attempts) = ScriptedDriver::new(vec![false, false, true]);
        let (mut monitor, _handle) = spawn_bootstrap(driver, 3);

        assert_eq!(monitor.wait_terminal().await, NetworkState::Connected);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(monitor.state(), NetworkState::Connected);
    });
}

/// Booting connected reads the prefix and enables ledger commands.
#[tokio::test]
async fn test_boot_connected() {
    let validated = config(3).validate().unwrap();
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (driver, _) = ScriptedDriver::new(vec![true]);
    let out = SharedBuffer::default();

    let mut ctx = boot_with(&validated, ledger.clone(), driver, Box::new(out.clone())).await;
    assert_eq!(ctx.network, NetworkState::Connected);
    assert_eq!(ctx.session.as_ref().unwrap().network_prefix(), Some("iota"));
    assert_eq!(ctx.settings.message_index, validated.message_index);

    assert_eq!(dispatch(&mut ctx, "address 0 0").await, Dispatch::Status(0));
}

/// Booting failed keeps the session but gates the ledger commands.
#[tokio::test]
async fn test_boot_failed() {
    let validated = config(2).validate().unwrap();
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (driver, attempts) = ScriptedDriver::new(Vec::new());
    let out = SharedBuffer::default();

    let mut ctx = boot_with(&validated, ledger.clone(), driver, Box::new(out.clone())).await;
    assert_eq!(ctx.network, NetworkState::Failed);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert!(ctx.session.is_some());
    assert!(ledger.calls().is_empty());

    assert_eq!(dispatch(&mut ctx, "balance 0 0").await, Dispatch::Status(-1));
    assert_eq!(dispatch(&mut ctx, "version").await, Dispatch::Status(0));
}

/// A rejected configuration boots without a session.
#[tokio::test]
async fn test_boot_invalid_config() {
    let invalid = WalletConfig {
        seed: "abc".to_string(),
        ..config(3)
    };
    let out = SharedBuffer::default();

    let mut ctx = console::boot(&invalid, Box::new(out.clone())).await;
    assert!(ctx.session.is_none());
    assert_eq!(ctx.network, NetworkState::Idle);
    assert_eq!(dispatch(&mut ctx, "version").await, Dispatch::Status(0));
    assert_eq!(dispatch(&mut ctx, "address 0 0").await, Dispatch::Status(-1));
}

/// A random seed still validates and yields a 32-byte secret each boot.
#[tokio::test]
async fn test_boot_random_seed() {
    let random = WalletConfig {
        seed: "random".to_string(),
        ..config(1)
    };
    let first = random.validate().unwrap();
    let second = random.validate().unwrap();
    assert_eq!(first.seed.as_bytes().len(), 32);
    assert_ne!(first.seed, second.seed);

    let ledger = Arc::new(MockLedger::with_prefix("atoi"));
    let (driver, _) = ScriptedDriver::new(vec![true]);
    let mut ctx = boot_with(&first, ledger, driver, Box::new(SharedBuffer::default())).await;
    assert_eq!(dispatch(&mut ctx, "address 0 1").await, Dispatch::Status(0));
}

/// The TCP probe drives a real boot against a local listener.
#[tokio::test]
async fn test_boot_with_tcp_probe() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let validated = config(2).validate().unwrap();
    let probe = network::transport::TcpProbe::new(address, Duration::from_secs(2), Duration::ZERO);
    let ledger = Arc::new(MockLedger::with_prefix("iota"));

    let ctx = boot_with(&validated, ledger, probe, Box::new(SharedBuffer::default())).await;
    assert_eq!(ctx.network, NetworkState::Connected);
}

/// The console loop runs lines until input ends or a restart.
#[tokio::test]
async fn test_console_loop() {
    let validated = config(1).validate().unwrap();
    let ledger = Arc::new(MockLedger::with_prefix("iota"));
    let (driver, _) = ScriptedDriver::new(vec![true]);
    let out = SharedBuffer::default();
    let mut ctx = boot_with(&validated, ledger.clone(), driver, Box::new(out.clone())).await;

    let input: &[u8] = b"address 0 0\n\nversion\n";
    assert_eq!(console::run(&mut ctx, input).await.unwrap(), Exit::EndOfInput);
    assert!(out.contents().contains("Addr[0]"));
    assert!(out.contents().contains("wallet-console v"));

    let input: &[u8] = b"version\nrestart\naddress 0 0\n";
    out.clear();
    assert_eq!(console::run(&mut ctx, input).await.unwrap(), Exit::Restart);
    assert!(!out.contents().contains("Addr[0]"));
}
