//! Boot sequence and the interactive loop.

use crate::commands::{dispatch, ConsoleSettings, Context, Dispatch};
use crate::config::{ValidatedConfig, WalletConfig};
use crate::errors::WalletError;
use crate::wallet::WalletSession;
use colored::Colorize;
use network::bootstrap::{spawn_bootstrap, NetworkState};
use network::client::NodeClient;
use network::ledger::Ledger;
use network::transport::{ConnectivityDriver, TcpProbe};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, warn};

/// How the interactive loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Input closed
    EndOfInput,
    /// A command asked for a reboot
    Restart,
}

/// Boots the console from configuration.
///
/// A rejected configuration yields a context without a session: only the
/// system commands work until the next restart.
pub async fn boot(config: &WalletConfig, out: Box<dyn Write + Send>) -> Context {
    let validated = match config.validate() {
        Ok(validated) => validated,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Context::new(out);
        }
    };

    let ledger = match NodeClient::new(validated.connect_timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create the node client: {}", e);
            return Context::new(out);
        }
    };

    let probe = TcpProbe::new(
        validated.endpoint.socket_addr(),
        validated.connect_timeout,
        validated.retry_delay,
    );
    boot_with(&validated, ledger, probe, out).await
}

/// Boots with the given ledger and connectivity driver.
///
/// Blocks until the bootstrap reaches a terminal state, then reads the
/// network prefix from the node when connected.
pub async fn boot_with<D>(
    config: &ValidatedConfig,
    ledger: Arc<dyn Ledger>,
    driver: D,
    out: Box<dyn Write + Send>,
) -> Context
where
    D: ConnectivityDriver + 'static,
{
    let mut session = WalletSession::from_config(config, ledger);

    info!("Connecting to {}", config.endpoint);
    let (mut monitor, _handle) = spawn_bootstrap(driver, config.max_retries);
    let network = monitor.wait_terminal().await;

    match network {
        NetworkState::Connected => {
            if let Err(e) = session.refresh_network_prefix().await {
                warn!("{}", e);
            }
        }
        _ => error!("Network unavailable, ledger commands are disabled"),
    }

    let mut context = Context::new(out).with_session(session, network);
    context.settings = ConsoleSettings {
        message_index: config.message_index.clone(),
        message_data: config.message_data.clone(),
        ..ConsoleSettings::default()
    };
    context
}

/// Reads commands from `input` until it closes or a restart is requested.
pub async fn run<R>(ctx: &mut Context, input: R) -> Result<Exit, WalletError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        write!(ctx.out, "{}", "> ".bold())?;
        ctx.out.flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(Exit::EndOfInput),
        };

        match dispatch(ctx, &line).await {
            Dispatch::Restart => return Ok(Exit::Restart),
            Dispatch::Status(status) => info!("{} -> {}", line.trim(), status),
            Dispatch::Empty => {}
        }
    }
}
