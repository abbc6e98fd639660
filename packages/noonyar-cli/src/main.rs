//! Noonyar terminal client
//!
//! Signs in with a phone one-time password and looks up queue tickets
//! against a Noonyar backend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cmd;
mod context;

use context::CliContext;

#[derive(Parser)]
#[command(name = "noonyar")]
#[command(about = "Noonyar login and queue status client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a one-time code sent to your phone
    Login {
        /// Phone number (09XXXXXXXXX); prompted for when omitted
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Show where a ticket stands in a bakery's queue
    Status {
        /// Bakery id
        #[arg(short, long)]
        bakery: u64,

        /// Ticket number
        #[arg(short, long)]
        ticket: u64,
    },

    /// Forget stored tokens
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::new()?;

    match cli.command {
        Commands::Login { phone } => cmd::login::run(&ctx, phone).await,
        Commands::Status { bakery, ticket } => cmd::status::run(&ctx, bakery, ticket).await,
        Commands::Logout => cmd::logout::run(&ctx),
    }
}
