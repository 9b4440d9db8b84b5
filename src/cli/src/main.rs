//! Interactive wallet console.

use anyhow::Result;
use cli::commands::Context;
use cli::config::WalletConfig;
use cli::console::{self, Exit};
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the wallet console.
#[derive(Debug, StructOpt)]
#[structopt(name = "wallet-console", about = "Interactive wallet console")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Node URL, overrides the configuration
    #[structopt(short, long)]
    node_url: Option<String>,

    /// Node port, overrides the configuration
    #[structopt(short = "p", long)]
    node_port: Option<u16>,

    /// Seed as 64 hex characters or "random", overrides the configuration
    #[structopt(short, long)]
    seed: Option<String>,
}

/// Layers defaults, file, environment and flags.
fn load_config(opt: &Opt) -> Result<WalletConfig> {
    let mut config = WalletConfig::load(opt.config.as_deref())?;
    config.apply_env()?;

    if let Some(url) = &opt.node_url {
        config.node_url = url.clone();
    }
    if let Some(port) = opt.node_port {
        config.node_port = port;
    }
    if let Some(seed) = &opt.seed {
        config.seed = seed.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    let mut stdin = BufReader::new(tokio::io::stdin());
    loop {
        // Configuration is read again on every boot
        let mut context = match load_config(&opt) {
            Ok(config) => console::boot(&config, Box::new(std::io::stdout())).await,
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                println!("{} {}", "Configuration error:".red(), e);
                Context::new(Box::new(std::io::stdout()))
            }
        };
        println!(
            "{} network {}",
            "Wallet console ready,".green(),
            context.network
        );

        match console::run(&mut context, &mut stdin).await? {
            Exit::Restart => {
                info!("Rebooting the console");
                continue;
            }
            Exit::EndOfInput => break,
        }
    }

    Ok(())
}
