//! Network bootstrap with a bounded retry budget.
//!
//! The state machine is pure; [`spawn_bootstrap`] drives it from a background
//! task and publishes every state change on a watch channel so the console
//! can gate ledger commands on it.

use crate::transport::ConnectivityDriver;
use std::fmt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Default number of connection attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Connectivity state of the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkState {
    /// Nothing attempted yet
    Idle,
    /// A connection attempt is in flight
    Connecting,
    /// The link is up
    Connected,
    /// The retry budget is spent
    Failed,
}

impl NetworkState {
    /// Connected and Failed end the bootstrap.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NetworkState::Connected | NetworkState::Failed)
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkState::Idle => "idle",
            NetworkState::Connecting => "connecting",
            NetworkState::Connected => "connected",
            NetworkState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Events fed into the bootstrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// Begin connecting
    Start,
    /// An attempt succeeded
    Connected,
    /// An attempt failed or the link dropped
    Disconnected,
}

/// What the driver should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapAction {
    /// Make another connection attempt
    Connect,
    /// Nothing to do
    None,
}

/// The retry state machine.
#[derive(Clone, Debug)]
pub struct NetworkBootstrap {
    state: NetworkState,
    retries: u32,
    max_retries: u32,
}

impl NetworkBootstrap {
    /// Creates a bootstrap allowing `max_retries` attempts, at least one.
    pub fn new(max_retries: u32) -> Self {
        Self {
            state: NetworkState::Idle,
            retries: 0,
            max_retries: max_retries.max(1),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Returns the number of failed attempts so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the attempt budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Applies an event and returns the follow-up action.
    ///
    /// Events that do not apply to the current state are ignored, so a late
    /// disconnect after `Failed` cannot restart the cycle.
    pub fn handle(&mut self, event: ConnectivityEvent) -> BootstrapAction {
        match (self.state, event) {
            (NetworkState::Idle, ConnectivityEvent::Start) => {
                self.state = NetworkState::Connecting;
                BootstrapAction::Connect
            }
            (NetworkState::Connecting, ConnectivityEvent::Connected) => {
                self.state = NetworkState::Connected;
                BootstrapAction::None
            }
            (NetworkState::Connecting, ConnectivityEvent::Disconnected) => {
                self.retries += 1;
                if self.retries < self.max_retries {
                    BootstrapAction::Connect
                } else {
                    self.state = NetworkState::Failed;
                    BootstrapAction::None
                }
            }
            _ => BootstrapAction::None,
        }
    }
}

/// Read side of a running bootstrap.
#[derive(Clone, Debug)]
pub struct BootstrapMonitor {
    state: watch::Receiver<NetworkState>,
}

impl BootstrapMonitor {
    /// Returns the latest published state.
    pub fn state(&self) -> NetworkState {
        *self.state.borrow()
    }

    /// Waits until the bootstrap reaches Connected or Failed.
    pub async fn wait_terminal(&mut self) -> NetworkState {
        loop {
            let current = *self.state.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            // Sender dropped means the task finished; re-read the last value
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}

/// Runs the bootstrap in a background task.
pub fn spawn_bootstrap<D>(driver: D, max_retries: u32) -> (BootstrapMonitor, JoinHandle<()>)
where
    D: ConnectivityDriver + 'static,
{
    let (tx, rx) = watch::channel(NetworkState::Idle);
    let handle = tokio::spawn(run_bootstrap(driver, NetworkBootstrap::new(max_retries), tx));
    (BootstrapMonitor { state: rx }, handle)
}

async fn run_bootstrap<D: ConnectivityDriver>(
    mut driver: D,
    mut bootstrap: NetworkBootstrap,
    tx: watch::Sender<NetworkState>,
) {
    let mut action = bootstrap.handle(ConnectivityEvent::Start);
    tx.send_replace(bootstrap.state());

    while action == BootstrapAction::Connect {
        let event = match driver.connect().await {
            Ok(()) => {
                info!("Connected to the network");
                ConnectivityEvent::Connected
            }
            Err(e) => {
                warn!(
                    "Connection attempt {}/{} failed: {}",
                    bootstrap.retries() + 1,
                    bootstrap.max_retries(),
                    e
                );
                ConnectivityEvent::Disconnected
            }
        };

        action = bootstrap.handle(event);
        tx.send_replace(bootstrap.state());

        if action == BootstrapAction::Connect {
            let delay = driver.retry_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    if bootstrap.state() == NetworkState::Failed {
        warn!(
            "Network bootstrap gave up after {} attempts",
            bootstrap.retries()
        );
    }
}
