//! Node commands for the wallet console.

use super::{Context, Outcome, ParsedArgs};
use crate::errors::WalletError;
use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};
use network::types::Endpoint;
use std::io::Write;

/// Prints the status of the current node.
pub fn info<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let Context { session, out, .. } = ctx;
        let session = session.as_ref().ok_or(WalletError::SessionUnavailable)?;

        let info = session.node_info().await?;
        writeln!(out, "{}", info)?;
        Ok(Outcome::Done)
    }
    .boxed()
}

/// Runs `node_info_set <url> <port>`.
///
/// The session only moves to the new node once it answered.
pub fn set<'a>(
    ctx: &'a mut Context,
    args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let url = args.text(0).unwrap_or_default();
        let endpoint = Endpoint::parse(url, Some(args.u16(1)?))?;

        let Context { session, out, .. } = ctx;
        let session = session.as_mut().ok_or(WalletError::SessionUnavailable)?;

        let info = session.switch_endpoint(endpoint).await?;
        writeln!(out, "{}", info)?;
        writeln!(out, "{} {}", "Node set to".green(), session.endpoint())?;
        Ok(Outcome::Done)
    }
    .boxed()
}
