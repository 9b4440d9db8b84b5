//! System commands, available regardless of network state.

use super::{Context, Outcome, ParsedArgs, Scope, COMMANDS};
use crate::errors::WalletError;
use colored::Colorize;
use futures::future::{BoxFuture, FutureExt};
use std::io::Write;
use tracing::info;

/// Lists every command with its usage.
pub fn help<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        for command in COMMANDS {
            let marker = match command.scope {
                Scope::System => "",
                Scope::Ledger => " (network)",
            };
            writeln!(ctx.out, "{}{}", command.usage().green(), marker)?;
            writeln!(ctx.out, "\t{}", command.help)?;
        }
        Ok(Outcome::Done)
    }
    .boxed()
}

/// Prints version and platform information.
pub fn version<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let device = ctx.device.info();
        writeln!(ctx.out, "wallet-console v{}", device.version)?;
        writeln!(
            ctx.out,
            "{} on {} with {} CPU cores",
            device.os, device.arch, device.cores
        )?;
        writeln!(ctx.out, "network: {}", ctx.network)?;
        Ok(Outcome::Done)
    }
    .boxed()
}

/// Asks the console to reboot.
pub fn restart<'a>(
    _ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        info!("Restarting");
        Ok(Outcome::Restart)
    }
    .boxed()
}

/// Prints the available memory.
pub fn free<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let free = ctx.device.free_memory_kb()?;
        writeln!(ctx.out, "free: {} kB", free)?;
        Ok(Outcome::Done)
    }
    .boxed()
}

/// Prints the memory use of the console.
pub fn heap<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let heap = ctx.device.heap()?;
        writeln!(ctx.out, "resident: {} kB", heap.resident_kb)?;
        writeln!(ctx.out, "peak resident: {} kB", heap.peak_resident_kb)?;
        writeln!(ctx.out, "data: {} kB", heap.data_kb)?;
        writeln!(ctx.out, "stack: {} kB", heap.stack_kb)?;
        Ok(Outcome::Done)
    }
    .boxed()
}

/// Prints the number of running tasks.
pub fn stack<'a>(
    ctx: &'a mut Context,
    _args: &'a ParsedArgs,
) -> BoxFuture<'a, Result<Outcome, WalletError>> {
    async move {
        let tasks = ctx.device.task_count()?;
        writeln!(ctx.out, "tasks: {}", tasks)?;
        Ok(Outcome::Done)
    }
    .boxed()
}
