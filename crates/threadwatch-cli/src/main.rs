//! threadwatch CLI — entry point.
//!
//! # Commands
//!
//! - `threadwatch run [--config PATH] [--env-file PATH] [--token-var NAME]` — the relay
//! - `threadwatch check [--config PATH]` — validate the config and print the routes
//!
//! Any startup failure prints a one-line diagnostic and exits with status 1.

mod check;
mod helpers;
mod relay;
mod signals;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use threadwatch_core::config::{DEFAULT_CONFIG_PATH, DEFAULT_ENV_PATH, DEFAULT_TOKEN_VAR};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Forward new Discord threads from watched channels to notification channels
#[derive(Parser)]
#[command(name = "threadwatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and relay thread notifications until stopped
    Run {
        /// Routing config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Env file to load before reading the token
        #[arg(long, default_value = DEFAULT_ENV_PATH)]
        env_file: PathBuf,

        /// Environment variable holding the bot token
        #[arg(long, default_value = DEFAULT_TOKEN_VAR)]
        token_var: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Validate the routing config and print a summary
    Check {
        /// Routing config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            env_file,
            token_var,
            logs,
        } => {
            init_logging(logs);
            relay::run(relay::RunOptions {
                config,
                env_file,
                token_var,
            })
            .await
        }
        Commands::Check { config } => check::run(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            helpers::print_error(&e);
            ExitCode::from(1)
        }
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("threadwatch=debug,info")
        } else {
            EnvFilter::new("threadwatch=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
