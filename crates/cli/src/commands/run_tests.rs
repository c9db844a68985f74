// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jug_core::{Ball, BallId, BallState, FakeClock, ModelSize, Priority, TerminalClassification};
use jug_provider::{ProviderAdapter, ProviderKind, RunOptions, RunResult};
use jug_vcs::{CommitResult, VcsAdapter};
use tempfile::tempdir;

use super::*;

fn ball(id: &str) -> Ball {
    let now = Utc::now();
    Ball {
        id: BallId::new(id),
        title: format!("title-{id}"),
        context: String::new(),
        acceptance_criteria: vec![],
        priority: Priority::Medium,
        model_size: ModelSize::Medium,
        model_override: None,
        agent_provider: None,
        state: BallState::Pending,
        blocked_reason: None,
        tags: vec!["all".to_string()],
        depends_on: vec![],
        working_dir: ".".to_string(),
        created_at: now,
        last_activity: now,
        completed_at: None,
        completion_note: None,
        update_count: 0,
        beads_issues: vec![],
        beads_primary: None,
        intent: None,
    }
}

fn cfg(project_dir: PathBuf) -> EngineConfig {
    EngineConfig {
        project_dir,
        session_id: "all".to_string(),
        ball_id: None,
        interactive: false,
        debug: false,
        user_message: None,
        cli_model: None,
        cli_provider: None,
        cli_vcs: None,
        max_iterations: 3,
        ignore_lock: true,
        daemon_mode: false,
        iteration_timeout: Duration::ZERO,
        iteration_delay: Duration::ZERO,
        iteration_delay_fuzz: Duration::ZERO,
        max_wait: Duration::ZERO,
        overload_retry_interval: Duration::from_secs(1),
        crash_max_retries: 3,
        vcs_project_config: None,
        vcs_global_config: None,
        provider_project_config: None,
        provider_global_config: None,
        global_model_overrides: HashMap::new(),
        project_model_overrides: HashMap::new(),
    }
}

struct OneShotProvider {
    result: Mutex<Option<RunResult>>,
    store_root: PathBuf,
    session_id: String,
}

#[async_trait]
impl ProviderAdapter for OneShotProvider {
    fn name(&self) -> &'static str {
        "one-shot"
    }
    fn is_installed(&self) -> bool {
        true
    }
    fn resolve_model(&self, canonical: &str) -> String {
        canonical.to_string()
    }
    async fn run(&self, _options: &RunOptions) -> RunResult {
        let sessions = jug_store::SessionStore::new(self.store_root.as_path());
        sessions.append_progress(&self.session_id, "progress").unwrap();
        let store = jug_store::BallStore::new(self.store_root.as_path());
        let mut balls = store.load_balls().unwrap();
        if let Some(b) = balls.iter_mut().find(|b| b.id.as_str() == "b1") {
            b.state = BallState::Complete;
            let b = b.clone();
            store.update_ball(&b).unwrap();
        }
        self.result.lock().unwrap().take().expect("run called more than once")
    }
}

struct FakeVcs;

#[async_trait]
impl VcsAdapter for FakeVcs {
    fn name(&self) -> &'static str {
        "fake"
    }
    async fn status(&self, _dir: &Path) -> std::result::Result<String, String> {
        Ok(String::new())
    }
    async fn has_changes(&self, _dir: &Path) -> std::result::Result<bool, String> {
        Ok(false)
    }
    async fn commit(&self, _dir: &Path, _message: &str) -> std::result::Result<CommitResult, String> {
        Ok(CommitResult {
            success: true,
            commit_hash: Some("deadbeef".to_string()),
            status_after: String::new(),
            error_message: None,
        })
    }
    async fn describe_working_copy(&self, _dir: &Path, _message: &str) -> std::result::Result<(), String> {
        Ok(())
    }
    async fn isolate_and_reset(&self, _dir: &Path, _target_rev: Option<&str>) -> std::result::Result<String, String> {
        Ok("reset".to_string())
    }
    async fn get_current_revision(&self, _dir: &Path) -> std::result::Result<String, String> {
        Ok("rev".to_string())
    }
}

#[tokio::test]
async fn execute_drives_the_loop_to_completion_through_the_engine() {
    let dir = tempdir().unwrap();
    let store = JuggleStore::open(dir.path()).unwrap();
    store.balls.append_ball(&ball("b1")).unwrap();
    let cfg = cfg(dir.path().to_path_buf());

    let mut result = RunResult::default();
    result.complete = true;
    result.commit_message = Some("feat(b1): done".to_string());
    let provider = Arc::new(OneShotProvider {
        result: Mutex::new(Some(result)),
        store_root: store.root.clone(),
        session_id: cfg.session_id.clone(),
    });
    let vcs = FakeVcs;
    let resolve_provider: &ProviderResolver = &move |_kind: ProviderKind| provider.clone() as Arc<dyn ProviderAdapter>;
    let clock = FakeClock::new(Utc::now());

    let outcome = execute(&cfg, &store, &vcs, resolve_provider, &clock).await.unwrap();
    assert_eq!(outcome.history.terminal, TerminalClassification::Complete);
    assert_eq!(outcome.history.iterations, 1);
}

#[test]
fn exit_code_is_zero_only_on_complete() {
    assert_eq!(exit_code(TerminalClassification::Complete), 0);
    assert_eq!(exit_code(TerminalClassification::Blocked), 1);
    assert_eq!(exit_code(TerminalClassification::Timeout), 1);
    assert_eq!(exit_code(TerminalClassification::RateLimitExceeded), 1);
    assert_eq!(exit_code(TerminalClassification::MaxIterationsReached), 1);
}
