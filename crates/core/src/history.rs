// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History records: one append-only entry per completed loop invocation.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// How a loop invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalClassification {
    Complete,
    Blocked,
    Timeout,
    RateLimitExceeded,
    MaxIterationsReached,
}

/// One record per completed loop invocation, owned exclusively by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub session_id: String,
    pub project_dir: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub max_iterations: u32,
    pub iterations: u32,
    pub terminal: TerminalClassification,
    #[serde(default)]
    pub reason: Option<String>,
    pub balls_complete: u32,
    pub balls_blocked: u32,
    pub balls_pending: u32,
    pub total_wait_time_secs: u64,
    #[serde(default)]
    pub overload_retries: u32,
    pub output_path: String,
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
