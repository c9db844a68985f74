// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform interface over the two concrete assistant CLI backends.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use jug_core::Signal;

/// Whether the subprocess's output is captured or its TTY is inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Headless,
    Interactive,
}

/// Permission posture requested of the assistant CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    AcceptEdits,
    Plan,
    Bypass,
}

/// Inputs to one provider invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub prompt: String,
    pub mode: RunMode,
    pub permission: PermissionMode,
    /// Zero means no timeout.
    pub timeout: Duration,
    pub system_prompt: Option<String>,
    pub model: String,
    pub working_dir: Option<PathBuf>,
}

/// Outcome of one provider invocation.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub captured_output: String,
    pub exit_code: Option<i32>,
    pub complete: bool,
    pub continue_: bool,
    pub blocked: bool,
    pub timed_out: bool,
    pub rate_limited: bool,
    pub overload_exhausted: bool,
    pub commit_message: Option<String>,
    pub blocked_reason: Option<String>,
    pub retry_after: Option<Duration>,
    pub error: Option<String>,
}

impl RunResult {
    /// Populate the signal-derived fields from an extracted marker, if any.
    pub fn apply_signal(&mut self, signal: Option<Signal>) {
        match signal {
            Some(Signal::Complete { commit_message }) => {
                self.complete = true;
                self.commit_message = commit_message;
            }
            Some(Signal::Continue { commit_message }) => {
                self.continue_ = true;
                self.commit_message = commit_message;
            }
            Some(Signal::Blocked { reason }) => {
                self.blocked = true;
                self.blocked_reason = Some(reason);
            }
            None => {}
        }
    }
}

/// A common interface implemented by each concrete assistant CLI backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short name for logging and model-override lookups (e.g. `"claude"`).
    fn name(&self) -> &'static str;

    /// Verify the backend's CLI binary is reachable on `PATH`.
    fn is_installed(&self) -> bool;

    /// Map a canonical model name (e.g. `"opus"`) to this backend's concrete
    /// flag/name, if it recognizes it.
    fn resolve_model(&self, canonical: &str) -> String;

    /// Run one invocation and return its classified result.
    async fn run(&self, options: &RunOptions) -> RunResult;
}
