//! Sensor command for the wallet console.

use super::{Context, Outcome, ParsedArgs};
use crate::errors::WalletError;
use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};
use network::types::Indexation;
use serde::Serialize;
use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::error;

/// One temperature reading as published on the ledger.
#[derive(Debug, Serialize)]
pub struct SensorReading<'a> {
    /// Reporting device
    pub device: &'a str,
    /// Degrees Celsius
    pub temperature: f32,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

/// Runs `sensor <repeat> [<delay>]`.
///
/// Every iteration runs even if an earlier one failed; the command fails if
/// any did.
pub fn run<'a>(
    ctx: &'a mut Context,
    args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let repeat = args.u32(0)?;
        let delay = Duration::from_secs(args.u64(1)?);

        let Context {
            session,
            settings,
            out,
            sensor,
            ..
        } = ctx;
        let session = session.as_ref().ok_or(WalletError::SessionUnavailable)?;

        let mut last_error = None;
        for iteration in 0..repeat {
            let reading = SensorReading {
                device: &settings.device_name,
                temperature: sensor.read_celsius(),
                timestamp: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
            };

            let data = serde_json::to_vec(&reading)?;
            let indexation = Indexation::new(settings.message_index.as_bytes(), data);

            match session.publish(&indexation).await {
                Ok(message_id) => {
                    writeln!(out, "{} {}", "Message ID:".green(), message_id)?;
                }
                Err(e) => {
                    error!("Sensor iteration {} failed: {}", iteration + 1, e);
                    writeln!(out, "{}", format!("iteration {}: {}", iteration + 1, e).red())?;
                    last_error = Some(e);
                }
            }

            if iteration + 1 < repeat && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Outcome::Done),
        }
    }
    .boxed()
}
