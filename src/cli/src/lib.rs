//! Interactive wallet console.

pub mod commands;
pub mod config;
pub mod console;
pub mod device;
pub mod errors;
pub mod wallet;

// Re-export commonly used types and functions
pub use commands::{dispatch, Context, Dispatch, Outcome, COMMANDS};
pub use config::{ValidatedConfig, WalletConfig};
pub use console::{boot, boot_with, Exit};
pub use errors::WalletError;
pub use wallet::WalletSession;
