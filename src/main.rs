//! netx CLI.
//!
//! - `netx dial <address>` - connect, optionally write and read, then close,
//!   printing one JSON record per phase.
//!
//! Exit status is 0 when every phase succeeded, 2 when a phase failed, and
//! 1 when the measurement could not run at all.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// netx unified CLI.
#[derive(Parser)]
#[command(
    name = "netx",
    version,
    about = "Dial network endpoints and report classified errors",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dial an address and report each phase.
    #[command(name = "dial")]
    Dial(Box<netx::cli::DialArgs>),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dial(args) => netx::cli::run(*args).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
