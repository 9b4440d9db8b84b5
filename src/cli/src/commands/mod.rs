//! Console commands and their dispatcher.
//!
//! Every command is one entry of [`COMMANDS`]: a name, an ordered argument
//! schema and a handler. A line is tokenized, its arguments are parsed
//! against the schema, and only a line that fully matches reaches the
//! handler. Ledger commands are additionally gated on the network being
//! connected and a wallet session existing.

pub mod address;
pub mod balance;
pub mod node;
pub mod send;
pub mod sensor;
pub mod system;

use crate::device::{Device, HostDevice, TemperatureSensor, ThermalZoneSensor};
use crate::errors::WalletError;
use crate::wallet::WalletSession;
use colored::Colorize;
use futures::future::BoxFuture;
use network::bootstrap::NetworkState;
use network::errors::NetworkError;
use std::io::Write;
use tracing::debug;

/// What a handler asks the console to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Wait for the next command
    Done,
    /// Tear the session down and boot again
    Restart,
}

/// Result of dispatching one console line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The line was blank
    Empty,
    /// The command ran, 0 on success and -1 on failure
    Status(i32),
    /// The command asked for a reboot
    Restart,
}

/// Settings handlers read from the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleSettings {
    /// Index attached to indexation payloads
    pub message_index: String,
    /// Data attached to `send` when no message is given
    pub message_data: String,
    /// Device name reported by the `sensor` command
    pub device_name: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            message_index: "Wallet Console".to_string(),
            message_data: "sent from the wallet console".to_string(),
            device_name: "wallet-console".to_string(),
        }
    }
}

/// Everything a handler may touch. Owned by the console task.
pub struct Context {
    /// The wallet session, absent when the configuration was rejected
    pub session: Option<WalletSession>,
    /// Connectivity reached by the bootstrap
    pub network: NetworkState,
    /// Configured message settings
    pub settings: ConsoleSettings,
    /// Where command output goes
    pub out: Box<dyn Write + Send>,
    /// Host diagnostics
    pub device: Box<dyn Device>,
    /// Temperature source
    pub sensor: Box<dyn TemperatureSensor>,
}

impl Context {
    /// Creates a context without a session, writing to `out`.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            session: None,
            network: NetworkState::Idle,
            settings: ConsoleSettings::default(),
            out,
            device: Box::new(HostDevice::default()),
            sensor: Box::new(ThermalZoneSensor::default()),
        }
    }

    /// Attaches a session and the network state it was bootstrapped to.
    pub fn with_session(mut self, session: WalletSession, network: NetworkState) -> Self {
        self.session = Some(session);
        self.network = network;
        self
    }
}

/// Type of an argument value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// Free text
    Text,
}

/// Whether an argument must be given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Must be given
    Required,
    /// Falls back to the given literal
    Default(&'static str),
    /// May be left out
    Optional,
}

/// One positional argument of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgSpec {
    /// Name shown in usage messages
    pub name: &'static str,
    /// Value type
    pub kind: ArgKind,
    /// Whether the argument must be given
    pub presence: Presence,
}

impl ArgSpec {
    const fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    const fn with_default(name: &'static str, kind: ArgKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Default(default),
        }
    }

    const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
        }
    }
}

/// A parsed argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Free text
    Text(String),
}

/// Arguments that matched a command's schema, by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: Vec<Option<ArgValue>>,
}

impl ParsedArgs {
    fn get(&self, position: usize) -> Option<&ArgValue> {
        self.values.get(position).and_then(Option::as_ref)
    }

    fn mismatch(position: usize) -> WalletError {
        WalletError::Usage(format!("argument {} has the wrong type", position + 1))
    }

    /// Gets a 16-bit argument.
    pub fn u16(&self, position: usize) -> Result<u16, WalletError> {
        match self.get(position) {
            Some(ArgValue::U16(value)) => Ok(*value),
            _ => Err(Self::mismatch(position)),
        }
    }

    /// Gets a 32-bit argument.
    pub fn u32(&self, position: usize) -> Result<u32, WalletError> {
        match self.get(position) {
            Some(ArgValue::U32(value)) => Ok(*value),
            _ => Err(Self::mismatch(position)),
        }
    }

    /// Gets a 64-bit argument.
    pub fn u64(&self, position: usize) -> Result<u64, WalletError> {
        match self.get(position) {
            Some(ArgValue::U64(value)) => Ok(*value),
            _ => Err(Self::mismatch(position)),
        }
    }

    /// Gets a text argument, `None` if an optional one was left out.
    pub fn text(&self, position: usize) -> Option<&str> {
        match self.get(position) {
            Some(ArgValue::Text(value)) => Some(value),
            _ => None,
        }
    }
}

/// Whether a command needs the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Always available
    System,
    /// Needs a session and a connected network
    Ledger,
}

/// A command handler.
pub type Handler =
    for<'a> fn(&'a mut Context, &'a ParsedArgs) -> BoxFuture<'a, Result<Outcome, WalletError>>;

/// One entry of the command table.
pub struct Command {
    /// Name typed at the prompt
    pub name: &'static str,
    /// One-line description
    pub help: &'static str,
    /// Positional arguments
    pub args: &'static [ArgSpec],
    /// Availability
    pub scope: Scope,
    /// The handler
    pub handler: Handler,
}

impl Command {
    /// Returns the usage line, e.g. `sensor <repeat> [<delay>]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for arg in self.args {
            match arg.presence {
                Presence::Required => usage.push_str(&format!(" <{}>", arg.name)),
                Presence::Default(_) | Presence::Optional => {
                    usage.push_str(&format!(" [<{}>]", arg.name))
                }
            }
        }
        usage
    }

    /// Parses tokens against the argument schema.
    pub fn parse_args(&self, tokens: &[String]) -> Result<ParsedArgs, WalletError> {
        let usage = || WalletError::Usage(self.usage());

        if tokens.len() > self.args.len() {
            return Err(usage());
        }

        let mut values = Vec::with_capacity(self.args.len());
        for (position, spec) in self.args.iter().enumerate() {
            let raw = match (tokens.get(position), spec.presence) {
                (Some(token), _) => token.as_str(),
                (None, Presence::Default(default)) => default,
                (None, Presence::Optional) => {
                    values.push(None);
                    continue;
                }
                (None, Presence::Required) => return Err(usage()),
            };

            let value = match spec.kind {
                ArgKind::U16 => raw.parse().map(ArgValue::U16).map_err(|_| usage())?,
                ArgKind::U32 => raw.parse().map(ArgValue::U32).map_err(|_| usage())?,
                ArgKind::U64 => raw.parse().map(ArgValue::U64).map_err(|_| usage())?,
                ArgKind::Text => ArgValue::Text(raw.to_string()),
            };
            values.push(Some(value));
        }

        Ok(ParsedArgs { values })
    }
}

const RANGE_ARGS: &[ArgSpec] = &[
    ArgSpec::required("start", ArgKind::U32),
    ArgSpec::required("end", ArgKind::U32),
];

const SEND_ARGS: &[ArgSpec] = &[
    ArgSpec::required("index", ArgKind::U32),
    ArgSpec::required("receiver", ArgKind::Text),
    ArgSpec::required("amount", ArgKind::U64),
    ArgSpec::optional("message", ArgKind::Text),
];

const NODE_ARGS: &[ArgSpec] = &[
    ArgSpec::required("url", ArgKind::Text),
    ArgSpec::required("port", ArgKind::U16),
];

const SENSOR_ARGS: &[ArgSpec] = &[
    ArgSpec::required("repeat", ArgKind::U32),
    ArgSpec::with_default("delay", ArgKind::U64, "1"),
];

/// The command table, built once and never changed at runtime.
pub static COMMANDS: &[Command] = &[
    Command {
        name: "help",
        help: "List the available commands",
        args: &[],
        scope: Scope::System,
        handler: system::help,
    },
    Command {
        name: "version",
        help: "Show version and platform information",
        args: &[],
        scope: Scope::System,
        handler: system::version,
    },
    Command {
        name: "restart",
        help: "Reboot the console, reloading the configuration",
        args: &[],
        scope: Scope::System,
        handler: system::restart,
    },
    Command {
        name: "free",
        help: "Show available memory",
        args: &[],
        scope: Scope::System,
        handler: system::free,
    },
    Command {
        name: "heap",
        help: "Show memory use of the console",
        args: &[],
        scope: Scope::System,
        handler: system::heap,
    },
    Command {
        name: "stack",
        help: "Show the number of running tasks",
        args: &[],
        scope: Scope::System,
        handler: system::stack,
    },
    Command {
        name: "address",
        help: "List wallet addresses from start to end index",
        args: RANGE_ARGS,
        scope: Scope::Ledger,
        handler: address::run,
    },
    Command {
        name: "balance",
        help: "Show balances from start to end index",
        args: RANGE_ARGS,
        scope: Scope::Ledger,
        handler: balance::run,
    },
    Command {
        name: "send",
        help: "Send <amount>Mi from address <index>, 0 sends an indexation message only",
        args: SEND_ARGS,
        scope: Scope::Ledger,
        handler: send::run,
    },
    Command {
        name: "node_info",
        help: "Show the node's status",
        args: &[],
        scope: Scope::Ledger,
        handler: node::info,
    },
    Command {
        name: "node_info_set",
        help: "Switch to another node",
        args: NODE_ARGS,
        scope: Scope::Ledger,
        handler: node::set,
    },
    Command {
        name: "sensor",
        help: "Send <repeat> temperature readings, <delay> seconds apart",
        args: SENSOR_ARGS,
        scope: Scope::Ledger,
        handler: sensor::run,
    },
];

/// Looks a command up by name.
pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// Splits a line on whitespace, keeping double-quoted text together.
pub fn tokenize(line: &str) -> Result<Vec<String>, WalletError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(WalletError::Usage("unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Runs one console line and reports its status.
///
/// Errors never escape: they are printed and turned into status -1.
pub async fn dispatch(ctx: &mut Context, line: &str) -> Dispatch {
    match dispatch_inner(ctx, line).await {
        Ok(Some(Outcome::Done)) => Dispatch::Status(0),
        Ok(Some(Outcome::Restart)) => Dispatch::Restart,
        Ok(None) => Dispatch::Empty,
        Err(e) => {
            let _ = writeln!(ctx.out, "{}", e.to_string().red());
            Dispatch::Status(-1)
        }
    }
}

async fn dispatch_inner(ctx: &mut Context, line: &str) -> Result<Option<Outcome>, WalletError> {
    let tokens = tokenize(line)?;
    let (name, args) = match tokens.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let command = find(name)
        .ok_or_else(|| WalletError::Usage(format!("unknown command {}, try help", name)))?;
    let parsed = command.parse_args(args)?;

    if command.scope == Scope::Ledger {
        if ctx.network != NetworkState::Connected {
            return Err(NetworkError::NotConnected(ctx.network.to_string()).into());
        }
        if ctx.session.is_none() {
            return Err(WalletError::SessionUnavailable);
        }
    }

    debug!("Running {}", command.name);
    let outcome = (command.handler)(ctx, &parsed).await?;
    Ok(Some(outcome))
}
