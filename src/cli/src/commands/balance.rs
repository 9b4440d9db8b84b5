//! Balance command for the wallet console.

use super::{Context, Outcome, ParsedArgs};
use crate::errors::WalletError;
use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};
use futures::StreamExt;
use std::io::Write;
use wallet_core::range::AddressRange;

/// Prints the balances of the addresses from `<start>` to `<end>`.
///
/// Stops at the first failed query.
pub fn run<'a>(
    ctx: &'a mut Context,
    args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        // No ledger query for a reversed range
        let range = AddressRange::new(args.u32(0)?, args.u32(1)?)?;

        let Context { session, out, .. } = ctx;
        let session = session.as_ref().ok_or(WalletError::SessionUnavailable)?;

        let mut balances = Box::pin(session.balances(range));
        while let Some(entry) = balances.next().await {
            let (record, balance) = entry?;
            writeln!(
                out,
                "{} {}\n\t{}i",
                format!("balance[{}]:", record.index).green(),
                record.bech32,
                balance
            )?;
        }

        Ok(Outcome::Done)
    }
    .boxed()
}
