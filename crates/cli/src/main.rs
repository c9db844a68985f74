// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jug - the Juggler workload-orchestrator CLI

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ball, daemon, run, session};
use jug_store::JuggleStore;

#[derive(Parser)]
#[command(name = "jug", version, about = "Juggler: an agent loop for working through balls of work")]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the agent loop to completion for one session
    Run(run::RunArgs),
    /// Manage balls of work
    Ball(ball::BallArgs),
    /// Manage sessions
    Session(session::SessionArgs),
    /// Inspect and steer a running loop invocation
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run_cli().await {
        eprintln!("Error: {}", format_error(&e));
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let project_dir = match &cli.directory {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| anyhow::anyhow!("cannot change to directory '{}': {}", dir.display(), e))?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Run(args) => run::handle(args, project_dir).await,
        other => {
            let store = JuggleStore::open(&project_dir)?;
            match other {
                Commands::Ball(args) => ball::handle(args.command, &store),
                Commands::Session(args) => session::handle(args.command, &store),
                Commands::Daemon(args) => daemon::handle(args.command, &store),
                Commands::Run(_) => unreachable!("handled above"),
            }
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).try_init();
}

/// Format an anyhow error, deduplicating the chain when the top-level
/// Display already repeats it (common with thiserror `#[from]` variants).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}
