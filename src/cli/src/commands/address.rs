//! Address command for the wallet console.

use super::{Context, Outcome, ParsedArgs};
use crate::errors::WalletError;
use futures::future::{BoxFuture, FutureExt};
use std::io::Write;
use tracing::info;
use wallet_core::range::AddressRange;

/// Lists the addresses from `<start>` to `<end>`.
pub fn run<'a>(
    ctx: &'a mut Context,
    args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        // The range is checked before anything is derived
        let range = AddressRange::new(args.u32(0)?, args.u32(1)?)?;

        let Context { session, out, .. } = ctx;
        let session = session.as_ref().ok_or(WalletError::SessionUnavailable)?;
        info!("Listing {} addresses from index {}", range.len(), range.start());

        for record in session.addresses(range) {
            writeln!(out, "{}", record?)?;
        }

        Ok(Outcome::Done)
    }
    .boxed()
}
