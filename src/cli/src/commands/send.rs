//! Send command for the wallet console.

use super::{Context, Outcome, ParsedArgs};
use crate::errors::WalletError;
use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};
use network::types::Indexation;
use std::io::Write;
use tracing::info;
use wallet_core::amount::{send_mode, SendMode};
use wallet_core::receiver::resolve_receiver;

/// Runs `send <index> <receiver> <amount> [<message>]`.
///
/// The receiver is resolved and the amount converted before anything is
/// sent; an amount of 0 submits the message alone.
pub fn run<'a>(
    ctx: &'a mut Context,
    args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let sender_index = args.u32(0)?;
        let receiver_text = args.text(1).unwrap_or_default();
        let amount = args.u64(2)?;

        let Context {
            session,
            settings,
            out,
            ..
        } = ctx;
        let session = session.as_ref().ok_or(WalletError::SessionUnavailable)?;

        // Resolve the receiver first
        let receiver = resolve_receiver(receiver_text, session.network_prefix())?;

        // Convert the amount
        let mode = send_mode(amount)?;

        // Attach the message
        let data = args.text(3).unwrap_or(&settings.message_data);
        let message = Indexation::new(settings.message_index.as_bytes(), data.as_bytes());

        match mode {
            SendMode::Indexation => writeln!(out, "send indexation payload")?,
            SendMode::Transfer(_) => writeln!(out, "send {}Mi to {}", amount, receiver_text)?,
        }

        let message_id = session
            .send(sender_index, receiver, mode, Some(message))
            .await?;
        info!("Sent message {}", message_id);
        writeln!(out, "{} {}", "Message ID:".green(), message_id)?;

        Ok(Outcome::Done)
    }
    .boxed()
}
