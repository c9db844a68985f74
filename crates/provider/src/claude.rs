// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for the `claude` CLI backend.
//!
//! Takes its prompt on stdin and maps permission modes to flags the binary
//! understands natively.

use std::process::Stdio;

use async_trait::async_trait;
use jug_core::signal::extract_signal;
use tokio::process::Command;

use crate::adapter::{PermissionMode, ProviderAdapter, RunMode, RunOptions, RunResult};
use crate::dictionaries::{is_overload_exhausted, is_rate_limited, parse_retry_after};
use crate::exec::run_teed;
use crate::which::which_binary;

/// Adapter for the `claude` CLI backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeAdapter;

impl ClaudeAdapter {
    fn build_command(&self, options: &RunOptions) -> Command {
        let mut cmd = Command::new("claude");
        cmd.arg("--print");
        cmd.arg("--model").arg(self.resolve_model(&options.model));

        match options.permission {
            PermissionMode::AcceptEdits => {
                cmd.arg("--permission-mode").arg("acceptEdits");
            }
            PermissionMode::Plan => {
                cmd.arg("--permission-mode").arg("plan");
            }
            PermissionMode::Bypass => {
                cmd.arg("--dangerously-skip-permissions");
            }
        }

        if let Some(system_prompt) = &options.system_prompt {
            cmd.arg("--append-system-prompt").arg(system_prompt);
        }

        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn is_installed(&self) -> bool {
        which_binary("claude")
    }

    fn resolve_model(&self, canonical: &str) -> String {
        match canonical {
            "opus" => "claude-opus-4".to_string(),
            "sonnet" => "claude-sonnet-4".to_string(),
            "haiku" => "claude-haiku-4".to_string(),
            other => other.to_string(),
        }
    }

    async fn run(&self, options: &RunOptions) -> RunResult {
        match options.mode {
            RunMode::Interactive => run_interactive(self, options).await,
            RunMode::Headless => run_headless(self, options).await,
        }
    }
}

async fn run_headless(adapter: &ClaudeAdapter, options: &RunOptions) -> RunResult {
    let cmd = adapter.build_command(options);
    let mut result = RunResult::default();

    let teed = match run_teed(cmd, options.timeout, Some(&options.prompt)).await {
        Ok(t) => t,
        Err(e) => {
            result.error = Some(format!("claude run failed: {e}"));
            return result;
        }
    };

    classify(&mut result, teed.combined, teed.exit_code, teed.timed_out);
    result
}

async fn run_interactive(adapter: &ClaudeAdapter, options: &RunOptions) -> RunResult {
    let mut cmd = adapter.build_command(options);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    let mut result = RunResult::default();
    match cmd.status().await {
        Ok(status) => result.exit_code = status.code(),
        Err(e) => result.error = Some(format!("claude run failed: {e}")),
    }
    result
}

fn classify(result: &mut RunResult, combined: String, exit_code: Option<i32>, timed_out: bool) {
    result.timed_out = timed_out;
    result.exit_code = exit_code;
    let exit_nonzero = exit_code.is_some_and(|c| c != 0);

    if timed_out {
        result.captured_output = combined;
        return;
    }

    result.rate_limited = is_rate_limited(&combined, result.error.as_deref());
    if result.rate_limited {
        result.retry_after = parse_retry_after(&combined);
    }
    result.overload_exhausted =
        is_overload_exhausted(&combined, result.error.as_deref(), exit_nonzero);

    if !result.rate_limited && !result.overload_exhausted {
        let signal = extract_signal(&combined);
        result.apply_signal(signal);
    }

    result.captured_output = combined;
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
