// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for the `codex` CLI backend.
//!
//! Takes its prompt as an argv argument rather than on stdin. Occasionally
//! emits a completion signal as a tool call instead of literal output, so
//! when nothing is found in-band this adapter falls back to exporting the
//! session transcript and re-scanning it.

use std::process::Stdio;

use async_trait::async_trait;
use jug_core::signal::extract_signal;
use jug_core::Signal;
use tokio::process::Command;

use crate::adapter::{PermissionMode, ProviderAdapter, RunMode, RunOptions, RunResult};
use crate::dictionaries::{is_overload_exhausted, is_rate_limited, parse_retry_after};
use crate::exec::run_teed;
use crate::which::which_binary;

/// Adapter for the `codex` CLI backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexAdapter;

impl CodexAdapter {
    fn build_command(&self, options: &RunOptions) -> Command {
        let mut cmd = Command::new("codex");
        cmd.arg("exec");
        cmd.arg(&options.prompt);
        cmd.arg("--model").arg(self.resolve_model(&options.model));

        match options.permission {
            PermissionMode::AcceptEdits => {
                cmd.arg("--sandbox").arg("workspace-write");
            }
            PermissionMode::Plan => {
                cmd.arg("--sandbox").arg("read-only");
            }
            PermissionMode::Bypass => {
                cmd.arg("--dangerously-bypass-approvals-and-sandbox");
            }
        }

        if let Some(system_prompt) = &options.system_prompt {
            cmd.arg("--instructions").arg(system_prompt);
        }

        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl ProviderAdapter for CodexAdapter {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn is_installed(&self) -> bool {
        which_binary("codex")
    }

    fn resolve_model(&self, canonical: &str) -> String {
        match canonical {
            "opus" => "o-pro".to_string(),
            "sonnet" => "o-standard".to_string(),
            "haiku" => "o-mini".to_string(),
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

async fn run_headless(adapter: &CodexAdapter, options: &RunOptions) -> RunResult {
    let cmd = adapter.build_command(options);
    let mut result = RunResult::default();

    let teed = match run_teed(cmd, options.timeout, None).await {
        Ok(t) => t,
        Err(e) => {
            result.error = Some(format!("codex run failed: {e}"));
            return result;
        }
    };

    classify(&mut result, teed.combined, teed.exit_code, teed.timed_out);

    if !result.timed_out
        && result.error.is_none()
        && !result.complete
        && !result.continue_
        && !result.blocked
        && !result.rate_limited
        && !result.overload_exhausted
    {
        recover_out_of_band(&mut result, options).await;
    }

    result
}

async fn run_interactive(adapter: &CodexAdapter, options: &RunOptions) -> RunResult {
    let mut cmd = adapter.build_command(options);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    let mut result = RunResult::default();
    match cmd.status().await {
        Ok(status) => result.exit_code = status.code(),
        Err(e) => result.error = Some(format!("codex run failed: {e}")),
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

/// How many of the most recent assistant messages the last-resort heuristic
/// scan considers, oldest-first exhausted before giving up.
const RECOVERY_SCAN_DEPTH: usize = 5;

/// Recovery path for when `codex` finished cleanly but emitted no recognizable
/// signal. Exports the most recent session transcript, re-scans the last
/// assistant message for a signal marker, and as a last resort scans the last
/// several assistant messages for a shell invocation of this orchestrator's
/// own "updating" subcommand.
async fn recover_out_of_band(result: &mut RunResult, options: &RunOptions) {
    let mut export_cmd = Command::new("codex");
    export_cmd.arg("session").arg("export").arg("--last").arg("--json");
    if let Some(dir) = &options.working_dir {
        export_cmd.current_dir(dir);
    }

    let output = match export_cmd.output().await {
        Ok(out) if out.status.success() => out,
        _ => {
            tracing::warn!("codex session export failed during out-of-band signal recovery");
            return;
        }
    };

    let transcript = String::from_utf8_lossy(&output.stdout);
    let messages = last_assistant_messages(&transcript, RECOVERY_SCAN_DEPTH);
    let Some(last) = messages.first() else {
        tracing::warn!("codex session export returned no assistant message to recover a signal from");
        return;
    };

    if let Some(signal) = extract_signal(last) {
        tracing::info!("recovered signal out-of-band from codex session export");
        result.apply_signal(Some(signal));
        return;
    }

    if messages.iter().any(|m| mentions_orchestrator_update(m)) {
        tracing::info!("inferring implicit continue signal from orchestrator update invocation");
        result.apply_signal(Some(Signal::Continue {
            commit_message: None,
        }));
    }
}

/// Extract the last assistant-role message's text and tool-output parts from
/// a `codex session export --json` transcript (one JSON object per line).
fn last_assistant_text(transcript: &str) -> Option<String> {
    last_assistant_messages(transcript, 1).into_iter().next()
}

/// The `limit` most recent assistant messages (text plus tool-output parts
/// joined per message), most recent first.
fn last_assistant_messages(transcript: &str, limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    for line in transcript.lines().rev() {
        if messages.len() >= limit {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let json: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(_) => continue,
        };
        if json.get("role").and_then(|v| v.as_str()) != Some("assistant") {
            continue;
        }

        let mut parts = Vec::new();
        if let Some(text) = json.get("text").and_then(|v| v.as_str()) {
            parts.push(text.to_string());
        }
        if let Some(outputs) = json.get("tool_outputs").and_then(|v| v.as_array()) {
            for item in outputs {
                if let Some(s) = item.as_str() {
                    parts.push(s.to_string());
                }
            }
        }
        if parts.is_empty() {
            continue;
        }
        messages.push(parts.join("\n"));
    }
    messages
}

/// Heuristic last-resort scan for a shell tool call that invokes this
/// orchestrator's own CLI with an "updating" subcommand, implying the
/// assistant considered its work an in-progress update rather than done.
/// Requires `jug` to appear as its own token followed later in the same
/// command-like fragment by an `update` token, so unrelated prose that
/// happens to mention both words doesn't false-positive.
fn mentions_orchestrator_update(text: &str) -> bool {
    for fragment in text.split(['`', '\n']) {
        let tokens: Vec<&str> = fragment
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '_'))
            .collect();
        let Some(jug_pos) = tokens.iter().position(|t| t.eq_ignore_ascii_case("jug")) else {
            continue;
        };
        if tokens[jug_pos + 1..].iter().any(|t| t.eq_ignore_ascii_case("update")) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
