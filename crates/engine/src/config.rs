// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation engine configuration.
//!
//! Everything the loop needs to know about one invocation lives in a single
//! explicit value rather than module-scope mutable statics, so the loop is
//! plain dependency injection: construct a config, pass it in, get a result.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default crash-retry ceiling before the loop bubbles a fatal error.
pub const DEFAULT_CRASH_MAX_RETRIES: u32 = 3;
/// Rate-limit backoff starting point when no `retry_after` hint is present.
pub const RATE_LIMIT_BASE_WAIT: Duration = Duration::from_secs(30);
/// Rate-limit backoff ceiling.
pub const RATE_LIMIT_MAX_WAIT: Duration = Duration::from_secs(16 * 60);

/// One loop invocation's full configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub project_dir: PathBuf,
    pub session_id: String,
    /// When set, the invocation is restricted to this single ball.
    pub ball_id: Option<String>,
    pub interactive: bool,
    pub debug: bool,
    pub user_message: Option<String>,
    /// `--model`, pinned for the whole invocation.
    pub cli_model: Option<String>,
    /// `--provider`, pinned for the whole invocation.
    pub cli_provider: Option<String>,
    /// `--vcs`, pinned for the whole invocation.
    pub cli_vcs: Option<String>,
    pub max_iterations: u32,
    pub ignore_lock: bool,
    pub daemon_mode: bool,
    /// Zero means no per-invocation timeout.
    pub iteration_timeout: Duration,
    /// Sleep between iterations when nonzero.
    pub iteration_delay: Duration,
    /// Symmetric jitter applied to `iteration_delay`.
    pub iteration_delay_fuzz: Duration,
    /// Ceiling on accumulated rate-limit/overload wait before giving up.
    /// Zero means unbounded.
    pub max_wait: Duration,
    pub overload_retry_interval: Duration,
    pub crash_max_retries: u32,
    pub vcs_project_config: Option<String>,
    pub vcs_global_config: Option<String>,
    pub provider_project_config: Option<String>,
    pub provider_global_config: Option<String>,
    /// Canonical model name overrides, merged global-then-project.
    pub global_model_overrides: HashMap<String, String>,
    pub project_model_overrides: HashMap<String, String>,
}

impl EngineConfig {
    /// Merge global and project model-name overrides, project taking
    /// precedence on key collision.
    pub fn merged_model_overrides(&self) -> HashMap<String, String> {
        let mut merged = self.global_model_overrides.clone();
        merged.extend(self.project_model_overrides.clone());
        merged
    }

    /// Whether the invocation is interactive or targets a specific ball —
    /// the condition under which a blocked ball still counts as workable.
    pub fn interactive_or_targeted(&self) -> bool {
        self.interactive || self.ball_id.is_some()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
