// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jug run` - drive the agent loop to completion for one session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use jug_core::{Clock, SystemClock, TerminalClassification};
use jug_engine::{run_loop, DaemonFiles, EngineConfig, LoopOutcome, ProviderResolver};
use jug_provider::ProviderKind;
use jug_store::JuggleStore;
use jug_vcs::{select_vcs_kind, VcsAdapter};

#[derive(Args)]
pub struct RunArgs {
    /// Session to draw balls from
    #[arg(long, default_value = "all")]
    pub session: String,
    /// Restrict the invocation to a single ball
    #[arg(long)]
    pub ball: Option<String>,
    /// Surface prompts for human input instead of erroring on missing context
    #[arg(long)]
    pub interactive: bool,
    #[arg(long)]
    pub debug: bool,
    /// Extra instruction appended to the synthesized prompt
    #[arg(long)]
    pub message: Option<String>,
    /// Pin the model for the whole invocation
    #[arg(long)]
    pub model: Option<String>,
    /// Pin the provider for the whole invocation: claude, codex
    #[arg(long)]
    pub provider: Option<String>,
    /// Pin the VCS backend: git, jj
    #[arg(long)]
    pub vcs: Option<String>,
    #[arg(long, default_value_t = 50)]
    pub max_iterations: u32,
    /// Skip the cross-process lock; for recovery only
    #[arg(long)]
    pub ignore_lock: bool,
    /// Write PID/state files and poll the control file between iterations
    #[arg(long)]
    pub daemon: bool,
}

pub async fn handle(args: RunArgs, project_dir: PathBuf) -> Result<()> {
    let store = JuggleStore::open(&project_dir)?;
    let cfg = build_config(&args, project_dir.clone());

    let vcs_kind = select_vcs_kind(
        None,
        cfg.cli_vcs.as_deref(),
        cfg.vcs_project_config.as_deref(),
        cfg.vcs_global_config.as_deref(),
        &project_dir,
    );
    let vcs = vcs_kind.adapter();
    let resolver: &ProviderResolver = &|kind: ProviderKind| kind.adapter();

    let outcome = execute(&cfg, &store, vcs.as_ref(), resolver, &SystemClock).await?;

    println!("{}", serde_json::to_string_pretty(&outcome.history)?);

    std::process::exit(exit_code(outcome.history.terminal));
}

/// The testable core: everything `handle` does except opening the store
/// from a CLI path, printing, and exiting the process. Tests inject a fake
/// `vcs`/`resolve_provider`/`clock` here the same way `run_loop`'s own tests
/// do.
pub async fn execute(
    cfg: &EngineConfig,
    store: &JuggleStore,
    vcs: &dyn VcsAdapter,
    resolve_provider: &ProviderResolver,
    clock: &dyn Clock,
) -> Result<LoopOutcome> {
    let daemon_files = if cfg.daemon_mode {
        Some(DaemonFiles::new(store.sessions.session_dir(&cfg.session_id)))
    } else {
        None
    };
    Ok(run_loop(cfg, store, vcs, resolve_provider, clock, daemon_files.as_ref()).await?)
}

fn build_config(args: &RunArgs, project_dir: PathBuf) -> EngineConfig {
    EngineConfig {
        project_dir,
        session_id: args.session.clone(),
        ball_id: args.ball.clone(),
        interactive: args.interactive,
        debug: args.debug,
        user_message: args.message.clone(),
        cli_model: args.model.clone(),
        cli_provider: args.provider.clone(),
        cli_vcs: args.vcs.clone(),
        max_iterations: args.max_iterations,
        ignore_lock: args.ignore_lock,
        daemon_mode: args.daemon,
        iteration_timeout: Duration::ZERO,
        iteration_delay: Duration::ZERO,
        iteration_delay_fuzz: Duration::ZERO,
        max_wait: Duration::ZERO,
        overload_retry_interval: Duration::from_secs(60),
        crash_max_retries: jug_engine::config::DEFAULT_CRASH_MAX_RETRIES,
        vcs_project_config: None,
        vcs_global_config: None,
        provider_project_config: None,
        provider_global_config: None,
        global_model_overrides: Default::default(),
        project_model_overrides: Default::default(),
    }
}

/// Exit status convention: 0 means the session ran dry (nothing left to do),
/// 1 covers every terminal condition that still needs attention from outside
/// the loop.
fn exit_code(terminal: TerminalClassification) -> i32 {
    match terminal {
        TerminalClassification::Complete => 0,
        TerminalClassification::Blocked
        | TerminalClassification::Timeout
        | TerminalClassification::RateLimitExceeded
        | TerminalClassification::MaxIterationsReached => 1,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
