// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

#[test]
fn serde_roundtrip() {
    let now = Utc::now();
    let record = HistoryRecord {
        session_id: "feat-x".into(),
        project_dir: "/tmp/proj".into(),
        started_at: now,
        ended_at: now,
        max_iterations: 5,
        iterations: 2,
        terminal: TerminalClassification::Complete,
        reason: None,
        balls_complete: 2,
        balls_blocked: 0,
        balls_pending: 0,
        total_wait_time_secs: 0,
        overload_retries: 0,
        output_path: "/tmp/proj/.juggle/sessions/feat-x/last_output.txt".into(),
    };
    let json = serde_json::to_string(&record).unwrap();
    let back: HistoryRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.iterations, 2);
    assert_eq!(back.terminal, TerminalClassification::Complete);
}
