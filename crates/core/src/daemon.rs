// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon control surface record types: PID info, iteration-boundary state,
//! and the single-shot control command file. The engine owns all three when
//! `daemon-mode` is set; otherwise they are absent.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Written once at loop start, when running in daemon mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PidInfo {
    pub pid: u32,
    pub session_id: String,
    pub project_dir: String,
    pub started_at: Timestamp,
    pub max_iterations: u32,
    pub model: String,
    pub provider: String,
}

/// One phase of an iteration, for monitor display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreFlight,
    Synthesizing,
    Running,
    Waiting,
    Committing,
    Finalizing,
}

/// Rewritten at every iteration boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonState {
    pub running: bool,
    pub paused: bool,
    #[serde(default)]
    pub current_ball_id: Option<String>,
    #[serde(default)]
    pub current_ball_title: Option<String>,
    pub iteration: u32,
    pub max_iterations: u32,
    pub balls_complete: u32,
    pub balls_pending: u32,
    pub model: String,
    pub provider: String,
    pub started_at: Timestamp,
    pub phase: Phase,
    #[serde(default)]
    pub phase_message: Option<String>,
    pub status: String,
}

/// A command written by an out-of-process monitor; consumed once per
/// iteration boundary and removed after handling, except `Pause` which
/// persists until a `Resume` is observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command", content = "arg")]
pub enum ControlCommand {
    Pause,
    Resume,
    Cancel,
    ChangeModel(String),
    SkipBall,
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
