// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon control surface: PID file, state file, and control file for
//! one session directory.
//!
//! All writes use the temp-file-then-rename idiom so a reader never observes
//! a half-written file. The control file is consumed single-shot except for
//! `Pause`, which is left in place until a matching `Resume` is read.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use jug_core::{ControlCommand, DaemonState, PidInfo, Result};

const PID_FILE: &str = "agent.pid";
const STATE_FILE: &str = "agent.state";
const CONTROL_FILE: &str = "agent.control";

/// The three daemon-surface files for a single session directory.
pub struct DaemonFiles {
    dir: PathBuf,
}

impl DaemonFiles {
    pub fn new(session_dir: impl Into<PathBuf>) -> Self {
        Self { dir: session_dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_pid_info(&self, info: &PidInfo) -> Result<()> {
        write_json(&self.path(PID_FILE), info)
    }

    /// Write the state file at an iteration boundary.
    pub fn write_state(&self, state: &DaemonState) -> Result<()> {
        write_json(&self.path(STATE_FILE), state)
    }

    /// Read the control file, if present. Consumes it unless the command is
    /// `Pause`, which persists until a `Resume` is observed and consumed.
    pub fn take_control(&self) -> Result<Option<ControlCommand>> {
        let path = self.path(CONTROL_FILE);
        let Ok(contents) = fs::read_to_string(&path) else {
            return Ok(None);
        };
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let command: ControlCommand = serde_json::from_str(trimmed)?;
        if !matches!(command, ControlCommand::Pause) {
            let _ = fs::remove_file(&path);
        }
        Ok(Some(command))
    }

    /// Remove the PID and control files on loop exit. The state file is left
    /// in place as the last-known-state record, with `running` set to false.
    pub fn cleanup(&self) -> Result<()> {
        let _ = fs::remove_file(self.path(PID_FILE));
        let _ = fs::remove_file(self.path(CONTROL_FILE));
        Ok(())
    }

    /// Write a control command for the running loop to pick up at its next
    /// iteration boundary. Used by the out-of-process monitor side.
    pub fn write_control(&self, command: &ControlCommand) -> Result<()> {
        write_json(&self.path(CONTROL_FILE), command)
    }

    /// Read the last-written state file, if any, without consuming it.
    pub fn read_state(&self) -> Result<Option<DaemonState>> {
        read_json(&self.path(STATE_FILE))
    }

    /// Read the PID info file, if any.
    pub fn read_pid_info(&self) -> Result<Option<PidInfo>> {
        read_json(&self.path(PID_FILE))
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        let bytes = serde_json::to_vec_pretty(value)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
