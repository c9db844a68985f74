// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent loop: resolves a session, then repeatedly synthesizes a prompt,
//! runs the provider, and interprets its completion signal until the
//! session's balls are exhausted, the invocation is cancelled, or a
//! configured limit is hit.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use jug_core::{
    Ball, BallId, BallState, Clock, ControlCommand, DaemonState, HistoryRecord, JugglerError,
    LockKey, ModelSize, Phase, PidInfo, Result, Session, Signal, TerminalClassification,
};
use jug_provider::{select_provider_kind, PermissionMode, ProviderAdapter, ProviderKind, RunMode, RunOptions};
use jug_store::JuggleStore;
use jug_vcs::VcsAdapter;
use tracing::{info, warn};

use crate::backoff::{calculate_fuzzy_delay, crash_wait, exceeds_max_wait, overload_wait, rate_limit_wait};
use crate::config::EngineConfig;
use crate::daemon::DaemonFiles;
use crate::prompt;

/// Daemon control file polling interval during a provider run.
const DAEMON_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Resolves a [`ProviderKind`] to a concrete adapter. Production callers pass
/// `&|kind| kind.adapter()`; tests inject a scripted adapter instead, which
/// is the only reason this indirection exists.
pub type ProviderResolver = dyn Fn(ProviderKind) -> Arc<dyn ProviderAdapter> + Send + Sync;

/// Outcome of a completed loop invocation, paired with the history record
/// that gets persisted alongside it.
pub struct LoopOutcome {
    pub history: HistoryRecord,
}

/// Run the agent loop to completion.
///
/// `vcs` and `resolve_provider` are resolved once by the caller (from the
/// selection cascades in [`jug_vcs`] and [`jug_provider`]) and injected here,
/// so the loop itself never chooses a backend — only when to hot-swap one.
pub async fn run_loop(
    cfg: &EngineConfig,
    store: &JuggleStore,
    vcs: &dyn VcsAdapter,
    resolve_provider: &ProviderResolver,
    clock: &dyn Clock,
    daemon: Option<&DaemonFiles>,
) -> Result<LoopOutcome> {
    let started_at = clock.now();

    // --- 1. Initialize -----------------------------------------------
    let session = resolve_session(store, &cfg.session_id)?;

    let lock_key = match &cfg.ball_id {
        Some(id) => LockKey::Ball(id.clone()),
        None => LockKey::Session(cfg.session_id.clone()),
    };
    let _lock = if cfg.ignore_lock { None } else { Some(store.locks.acquire(&lock_key, clock)?) };

    let default_provider_kind = select_provider_kind(
        cfg.cli_provider.as_deref(),
        None,
        cfg.provider_project_config.as_deref(),
        cfg.provider_global_config.as_deref(),
    );
    let default_provider = resolve_provider(default_provider_kind);
    if !default_provider.is_installed() {
        return Err(JugglerError::ProviderUnavailable(default_provider_kind.name().to_string()));
    }

    let model_overrides = cfg.merged_model_overrides();

    if cfg.daemon_mode {
        if let Some(daemon) = daemon {
            daemon.write_pid_info(&PidInfo {
                pid: std::process::id(),
                session_id: cfg.session_id.clone(),
                project_dir: cfg.project_dir.display().to_string(),
                started_at,
                max_iterations: cfg.max_iterations,
                model: cfg.cli_model.clone().unwrap_or_else(|| "auto".to_string()),
                provider: default_provider_kind.name().to_string(),
            })?;
        }
    }

    let result = run_body(
        cfg, store, vcs, default_provider_kind, resolve_provider, &model_overrides,
        session.as_ref(), clock, daemon, started_at,
    )
    .await;

    if let Some(daemon) = daemon {
        let _ = daemon.cleanup();
        if cfg.daemon_mode {
            if let Ok(outcome) = &result {
                let _ = daemon.write_state(&final_daemon_state(cfg, &outcome.history, default_provider_kind));
            }
        }
    }

    if let Ok(outcome) = &result {
        let _ = persist_history(&store.root, &outcome.history);
    }

    result
}

fn final_daemon_state(cfg: &EngineConfig, history: &HistoryRecord, provider_kind: ProviderKind) -> DaemonState {
    DaemonState {
        running: false,
        paused: false,
        current_ball_id: None,
        current_ball_title: None,
        iteration: history.iterations,
        max_iterations: cfg.max_iterations,
        balls_complete: history.balls_complete,
        balls_pending: history.balls_pending,
        model: cfg.cli_model.clone().unwrap_or_else(|| "auto".to_string()),
        provider: provider_kind.name().to_string(),
        started_at: history.started_at,
        phase: Phase::Finalizing,
        phase_message: history.reason.clone(),
        status: format!("{:?}", history.terminal),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_body(
    cfg: &EngineConfig,
    store: &JuggleStore,
    vcs: &dyn VcsAdapter,
    default_provider_kind: ProviderKind,
    resolve_provider: &ProviderResolver,
    model_overrides: &HashMap<String, String>,
    session: Option<&Session>,
    clock: &dyn Clock,
    daemon: Option<&DaemonFiles>,
    started_at: jug_core::Timestamp,
) -> Result<LoopOutcome> {
    // --- 2. Pre-flight -------------------------------------------------
    let mut balls = store.balls.load_balls()?;
    let (mut workable, mut blocked_count) = count_workable(cfg, &balls);

    if workable == 0 && blocked_count > 0 {
        return Ok(finished(
            cfg, started_at, clock, TerminalClassification::Blocked,
            Some("no workable balls; all remaining are blocked".to_string()),
            0, Duration::ZERO, 0, &balls, cfg,
        ));
    }
    if workable == 0 && blocked_count == 0 {
        return Ok(finished(
            cfg, started_at, clock, TerminalClassification::Complete, None,
            0, Duration::ZERO, 0, &balls, cfg,
        ));
    }

    let mut total_wait = Duration::ZERO;
    let mut overload_retries: u32 = 0;
    let mut crash_attempt: u32 = 0;
    let mut rate_limit_attempt: u32 = 0;
    let mut paused_model_override: Option<String> = None;

    for iteration in 1..=cfg.max_iterations {
        if let Some(daemon) = daemon {
            if let Some(terminal) = poll_daemon(daemon, &mut paused_model_override).await? {
                return Ok(finished(cfg, started_at, clock, terminal, Some("cancelled by daemon control".to_string()), iteration - 1, total_wait, overload_retries, &balls, cfg));
            }
        }

        let targeted_ball = cfg.ball_id.as_ref().and_then(|id| find_ball(&balls, id));

        let provider_kind = iteration_provider_kind(cfg, default_provider_kind, targeted_ball);
        let provider = resolve_provider(provider_kind);

        let canonical_model = paused_model_override.clone().unwrap_or_else(|| select_model(cfg, &balls, session, targeted_ball));
        let model_for_run = model_overrides.get(&canonical_model).cloned().unwrap_or_else(|| canonical_model.clone());

        if let Some(daemon) = daemon {
            daemon.write_state(&DaemonState {
                running: true,
                paused: false,
                current_ball_id: targeted_ball.map(|b| b.id.as_str().to_string()),
                current_ball_title: targeted_ball.map(|b| b.title.clone()),
                iteration,
                max_iterations: cfg.max_iterations,
                balls_complete: count_state(&balls, BallState::Complete),
                balls_pending: workable,
                model: canonical_model.clone(),
                provider: provider_kind.name().to_string(),
                started_at,
                phase: Phase::Synthesizing,
                phase_message: None,
                status: "running".to_string(),
            })?;
        }

        let before_count = store.sessions.progress_line_count(&cfg.session_id)?;

        let selected = prompt::select_balls(&balls, &cfg.session_id, cfg.ball_id.as_deref())?;
        let prompt_text = prompt::synthesize(session, &cfg.session_id, &selected, cfg.debug, cfg.user_message.as_deref());

        let options = RunOptions {
            prompt: prompt_text,
            mode: if cfg.interactive { RunMode::Interactive } else { RunMode::Headless },
            permission: PermissionMode::AcceptEdits,
            timeout: cfg.iteration_timeout,
            system_prompt: None,
            model: model_for_run,
            working_dir: Some(cfg.project_dir.clone()),
        };

        let run_result = provider.run(&options).await;

        // step g: crash
        if let Some(err) = &run_result.error {
            crash_attempt += 1;
            warn!(attempt = crash_attempt, error = %err, "provider run crashed");
            if crash_attempt > cfg.crash_max_retries {
                return Err(JugglerError::Crash(err.clone()));
            }
            let wait = crash_wait(crash_attempt);
            total_wait += wait;
            tokio::time::sleep(wait).await;
            continue;
        }
        crash_attempt = 0;

        if run_result.timed_out {
            return Ok(finished(cfg, started_at, clock, TerminalClassification::Timeout, Some("provider run timed out".to_string()), iteration, total_wait, overload_retries, &balls, cfg));
        }

        // step h: rate limit
        if run_result.rate_limited {
            let wait = rate_limit_wait(run_result.retry_after, rate_limit_attempt);
            if exceeds_max_wait(total_wait, wait, cfg.max_wait) {
                return Ok(finished(cfg, started_at, clock, TerminalClassification::RateLimitExceeded, Some("rate-limit wait ceiling exceeded".to_string()), iteration, total_wait, overload_retries, &balls, cfg));
            }
            rate_limit_attempt += 1;
            total_wait += wait;
            info!(wait_secs = wait.as_secs(), "rate limited, retrying same iteration");
            tokio::time::sleep(wait).await;
            continue;
        }
        rate_limit_attempt = 0;

        // step i: overload
        if run_result.overload_exhausted {
            let wait = overload_wait(cfg.overload_retry_interval);
            if exceeds_max_wait(total_wait, wait, cfg.max_wait) {
                return Ok(finished(cfg, started_at, clock, TerminalClassification::RateLimitExceeded, Some("overload wait ceiling exceeded".to_string()), iteration, total_wait, overload_retries, &balls, cfg));
            }
            overload_retries += 1;
            total_wait += wait;
            info!(wait_secs = wait.as_secs(), "provider overloaded, retrying same iteration");
            tokio::time::sleep(wait).await;
            continue;
        }

        let _ = store.sessions.write_last_output(&cfg.session_id, &run_result.captured_output);

        let after_count = store.sessions.progress_line_count(&cfg.session_id)?;
        let progress_grew = after_count > before_count;

        let signal = extract_honored_signal(&run_result);

        match signal {
            Some(Signal::Complete { commit_message }) if progress_grew => {
                balls = store.balls.load_balls()?;
                if all_terminal(&balls, &cfg.session_id) {
                    if let Some(msg) = &commit_message {
                        let _ = vcs.commit(&cfg.project_dir, msg).await;
                    }
                    return Ok(finished(cfg, started_at, clock, TerminalClassification::Complete, None, iteration, total_wait, overload_retries, &balls, cfg));
                }
                warn!("premature COMPLETE signal: balls remain; continuing");
            }
            Some(Signal::Continue { commit_message }) if progress_grew => {
                if let Some(msg) = &commit_message {
                    let _ = vcs.commit(&cfg.project_dir, msg).await;
                }
                balls = store.balls.load_balls()?;
                let (w, b) = count_workable(cfg, &balls);
                workable = w;
                blocked_count = b;
            }
            Some(Signal::Blocked { reason }) => {
                if let Some(ball) = targeted_ball.cloned().or_else(|| balls.iter().find(|b| matches!(b.state, BallState::InProgress)).cloned()) {
                    if !progress_grew {
                        if let Ok(true) = vcs.has_changes(&cfg.project_dir).await {
                            let _ = vcs.describe_working_copy(&cfg.project_dir, &format!("BLOCKED: {reason}")).await;
                            let _ = vcs.isolate_and_reset(&cfg.project_dir, None).await;
                        }
                    }
                    mark_blocked(store, &ball.id, &reason)?;
                    balls = store.balls.load_balls()?;
                    let (w, b) = count_workable(cfg, &balls);
                    workable = w;
                    blocked_count = b;
                }
            }
            Some(_) => {
                warn!("signal present but progress did not grow; ignoring as unvalidated");
            }
            None => {}
        }

        // step p: fallback terminal check
        if workable == 0 {
            let terminal = if blocked_count > 0 { TerminalClassification::Blocked } else { TerminalClassification::Complete };
            return Ok(finished(cfg, started_at, clock, terminal, None, iteration, total_wait, overload_retries, &balls, cfg));
        }

        // step q: inter-iteration delay
        if iteration < cfg.max_iterations && !cfg.iteration_delay.is_zero() {
            tokio::time::sleep(calculate_fuzzy_delay(cfg.iteration_delay, cfg.iteration_delay_fuzz)).await;
        }
    }

    Ok(finished(cfg, started_at, clock, TerminalClassification::MaxIterationsReached, None, cfg.max_iterations, total_wait, overload_retries, &balls, cfg))
}

fn resolve_session(store: &JuggleStore, session_id: &str) -> Result<Option<Session>> {
    if jug_core::meta_session::is_meta(session_id) {
        return store.sessions.load_session(session_id);
    }
    match store.sessions.load_session(session_id)? {
        Some(s) => Ok(Some(s)),
        None => Err(JugglerError::not_found("session", session_id)),
    }
}

fn count_workable(cfg: &EngineConfig, balls: &[Ball]) -> (u32, u32) {
    let interactive_or_targeted = cfg.interactive_or_targeted();
    let mut workable = 0;
    let mut blocked = 0;
    for b in balls.iter().filter(|b| b.in_session(&cfg.session_id)) {
        if b.is_workable(interactive_or_targeted) {
            workable += 1;
        } else if b.state == BallState::Blocked {
            blocked += 1;
        }
    }
    (workable, blocked)
}

fn count_state(balls: &[Ball], state: BallState) -> u32 {
    balls.iter().filter(|b| b.state == state).count() as u32
}

fn find_ball<'a>(balls: &'a [Ball], id: &str) -> Option<&'a Ball> {
    balls.iter().find(|b| b.id.as_str() == id || b.short_id().starts_with(id))
}

fn all_terminal(balls: &[Ball], session_id: &str) -> bool {
    balls.iter().filter(|b| b.in_session(session_id)).all(|b| b.state.is_terminal())
}

fn iteration_provider_kind(cfg: &EngineConfig, default_kind: ProviderKind, targeted: Option<&Ball>) -> ProviderKind {
    if cfg.cli_provider.is_some() {
        return default_kind;
    }
    targeted
        .and_then(|b| b.agent_provider.as_deref())
        .and_then(ProviderKind::parse)
        .unwrap_or(default_kind)
}

fn model_size_to_canonical(size: ModelSize) -> &'static str {
    match size {
        ModelSize::Large => "opus",
        ModelSize::Medium => "sonnet",
        ModelSize::Small => "haiku",
        ModelSize::Blank => "opus",
    }
}

fn size_rank(size: ModelSize) -> u8 {
    match size {
        ModelSize::Large => 2,
        ModelSize::Medium => 1,
        ModelSize::Small => 0,
        ModelSize::Blank => 0,
    }
}

/// Model-selection cascade: CLI pin, then a single targeted ball's own
/// override, then the size most preferred across active balls (blank
/// preferences defer to the session default), ties broken toward the
/// larger model, defaulting to opus when nothing expresses a preference.
fn select_model(cfg: &EngineConfig, balls: &[Ball], session: Option<&Session>, targeted: Option<&Ball>) -> String {
    if let Some(m) = &cfg.cli_model {
        return m.clone();
    }
    if let Some(b) = targeted {
        if let Some(o) = &b.model_override {
            return o.clone();
        }
    }
    let session_default = session.map(|s| s.default_model).unwrap_or_default();
    let mut counts: HashMap<ModelSize, u32> = HashMap::new();
    for b in balls.iter().filter(|b| b.in_session(&cfg.session_id) && !b.state.is_terminal()) {
        let size = if b.model_size == ModelSize::Blank { session_default } else { b.model_size };
        if size == ModelSize::Blank {
            continue;
        }
        *counts.entry(size).or_insert(0) += 1;
    }
    let Some(max) = counts.values().copied().max() else {
        return "opus".to_string();
    };
    // `max` was just derived from `counts.values()`, so at least one entry matches it.
    #[allow(clippy::expect_used)]
    let winner = counts
        .into_iter()
        .filter(|(_, c)| *c == max)
        .map(|(s, _)| s)
        .max_by_key(|s| size_rank(*s))
        .expect("counts non-empty");
    model_size_to_canonical(winner).to_string()
}

fn extract_honored_signal(result: &jug_provider::RunResult) -> Option<Signal> {
    if result.complete {
        Some(Signal::Complete { commit_message: result.commit_message.clone() })
    } else if result.continue_ {
        Some(Signal::Continue { commit_message: result.commit_message.clone() })
    } else if result.blocked {
        Some(Signal::Blocked { reason: result.blocked_reason.clone().unwrap_or_default() })
    } else {
        None
    }
}

fn mark_blocked(store: &JuggleStore, id: &BallId, reason: &str) -> Result<()> {
    let mut balls = store.balls.load_balls()?;
    let Some(ball) = balls.iter_mut().find(|b| &b.id == id) else {
        return Err(JugglerError::not_found("ball", id.as_str()));
    };
    ball.state = BallState::Blocked;
    ball.blocked_reason = Some(reason.to_string());
    store.balls.update_ball(ball)
}

/// Poll the daemon control file once. Returns `Some(terminal)` when the
/// loop should stop; blocks (by sleeping in a poll loop) while paused.
async fn poll_daemon(daemon: &DaemonFiles, model_override: &mut Option<String>) -> Result<Option<TerminalClassification>> {
    loop {
        match daemon.take_control()? {
            Some(ControlCommand::Cancel) => return Ok(Some(TerminalClassification::Blocked)),
            Some(ControlCommand::Pause) => {
                tokio::time::sleep(DAEMON_POLL_INTERVAL).await;
                continue;
            }
            Some(ControlCommand::Resume) => return Ok(None),
            Some(ControlCommand::ChangeModel(model)) => {
                *model_override = Some(model);
                return Ok(None);
            }
            Some(ControlCommand::SkipBall) | None => return Ok(None),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn finished(
    cfg: &EngineConfig,
    started_at: jug_core::Timestamp,
    clock: &dyn Clock,
    terminal: TerminalClassification,
    reason: Option<String>,
    iterations: u32,
    total_wait: Duration,
    overload_retries: u32,
    balls: &[Ball],
    _cfg2: &EngineConfig,
) -> LoopOutcome {
    let complete = count_state(balls, BallState::Complete);
    let (_workable, blocked) = count_workable(cfg, balls);
    let pending = balls
        .iter()
        .filter(|b| b.in_session(&cfg.session_id) && matches!(b.state, BallState::Pending | BallState::InProgress))
        .count() as u32;
    LoopOutcome {
        history: HistoryRecord {
            session_id: cfg.session_id.clone(),
            project_dir: cfg.project_dir.display().to_string(),
            started_at,
            ended_at: clock.now(),
            max_iterations: cfg.max_iterations,
            iterations,
            terminal,
            reason,
            balls_complete: complete,
            balls_blocked: blocked,
            balls_pending: pending,
            total_wait_time_secs: total_wait.as_secs(),
            overload_retries,
            output_path: "last_output.txt".to_string(),
        },
    }
}

fn persist_history(store_root: &Path, record: &HistoryRecord) -> Result<()> {
    let path = store_root.join("history.jsonl");
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    file.write_all(&line)?;
    Ok(())
}

#[cfg(test)]
#[path = "loop_engine_tests.rs"]
mod tests;
