// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;

use chrono::Utc;
use jug_core::{ControlCommand, DaemonState, Phase, PidInfo};
use tempfile::tempdir;

use super::*;

fn pid_info() -> PidInfo {
    PidInfo {
        pid: 1234,
        session_id: "all".to_string(),
        project_dir: "/tmp/proj".to_string(),
        started_at: Utc::now(),
        max_iterations: 10,
        model: "opus".to_string(),
        provider: "claude".to_string(),
    }
}

fn daemon_state() -> DaemonState {
    DaemonState {
        running: true,
        paused: false,
        current_ball_id: None,
        current_ball_title: None,
        iteration: 1,
        max_iterations: 10,
        balls_complete: 0,
        balls_pending: 3,
        model: "opus".to_string(),
        provider: "claude".to_string(),
        started_at: Utc::now(),
        phase: Phase::PreFlight,
        phase_message: None,
        status: "running".to_string(),
    }
}

#[test]
fn write_pid_info_produces_a_readable_json_file() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_pid_info(&pid_info()).unwrap();
    let contents = fs::read_to_string(dir.path().join("agent.pid")).unwrap();
    assert!(contents.contains("\"pid\": 1234"));
}

#[test]
fn write_state_leaves_no_stray_tmp_file() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_state(&daemon_state()).unwrap();
    assert!(dir.path().join("agent.state").exists());
    assert!(!dir.path().join("agent.state.tmp").exists());
}

#[test]
fn take_control_returns_none_when_no_file_present() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    assert!(files.take_control().unwrap().is_none());
}

#[test]
fn take_control_consumes_cancel_in_one_shot() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("agent.control"), r#"{"command":"cancel"}"#).unwrap();
    let files = DaemonFiles::new(dir.path());
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::Cancel));
    assert!(!dir.path().join("agent.control").exists());
}

#[test]
fn take_control_leaves_pause_in_place_until_resume() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("agent.control"), r#"{"command":"pause"}"#).unwrap();
    let files = DaemonFiles::new(dir.path());
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::Pause));
    assert!(dir.path().join("agent.control").exists());
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::Pause));

    fs::write(dir.path().join("agent.control"), r#"{"command":"resume"}"#).unwrap();
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::Resume));
    assert!(!dir.path().join("agent.control").exists());
}

#[test]
fn take_control_parses_change_model_with_arg() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("agent.control"), r#"{"command":"change_model","arg":"sonnet"}"#).unwrap();
    let files = DaemonFiles::new(dir.path());
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::ChangeModel("sonnet".to_string())));
}

#[test]
fn write_control_is_read_back_by_take_control() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_control(&ControlCommand::SkipBall).unwrap();
    assert_eq!(files.take_control().unwrap(), Some(ControlCommand::SkipBall));
}

#[test]
fn read_state_returns_none_when_no_file_present() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    assert!(files.read_state().unwrap().is_none());
}

#[test]
fn read_state_roundtrips_what_was_written() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_state(&daemon_state()).unwrap();
    let state = files.read_state().unwrap().unwrap();
    assert_eq!(state.iteration, 1);
    assert_eq!(state.status, "running");
}

#[test]
fn read_pid_info_returns_none_when_no_file_present() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    assert!(files.read_pid_info().unwrap().is_none());
}

#[test]
fn read_pid_info_roundtrips_what_was_written() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_pid_info(&pid_info()).unwrap();
    let info = files.read_pid_info().unwrap().unwrap();
    assert_eq!(info.pid, 1234);
    assert_eq!(info.session_id, "all");
}

#[test]
fn cleanup_removes_pid_and_control_but_keeps_state() {
    let dir = tempdir().unwrap();
    let files = DaemonFiles::new(dir.path());
    files.write_pid_info(&pid_info()).unwrap();
    files.write_state(&daemon_state()).unwrap();
    fs::write(dir.path().join("agent.control"), r#"{"command":"cancel"}"#).unwrap();
    files.cleanup().unwrap();
    assert!(!dir.path().join("agent.pid").exists());
    assert!(!dir.path().join("agent.control").exists());
    assert!(dir.path().join("agent.state").exists());
}
