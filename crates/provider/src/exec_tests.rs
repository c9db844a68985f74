// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::process::Command;

#[tokio::test]
async fn captures_stdout_and_stderr() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("echo out-line; echo err-line 1>&2");
    let result = run_teed(cmd, Duration::from_secs(5), None).await.unwrap();
    assert!(result.combined.contains("out-line"));
    assert!(result.combined.contains("err-line"));
    assert_eq!(result.exit_code, Some(0));
    assert!(!result.timed_out);
}

#[tokio::test]
async fn reports_nonzero_exit_code() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("exit 3");
    let result = run_teed(cmd, Duration::from_secs(5), None).await.unwrap();
    assert_eq!(result.exit_code, Some(3));
}

#[tokio::test]
async fn kills_on_timeout() {
    let mut cmd = Command::new("sleep");
    cmd.arg("5");
    let result = run_teed(cmd, Duration::from_millis(50), None).await.unwrap();
    assert!(result.timed_out);
}

#[tokio::test]
async fn zero_timeout_means_no_deadline() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("echo quick");
    let result = run_teed(cmd, Duration::ZERO, None).await.unwrap();
    assert!(!result.timed_out);
    assert!(result.combined.contains("quick"));
}

#[tokio::test]
async fn writes_stdin_data_to_child() {
    let cmd = Command::new("cat");
    let result = run_teed(cmd, Duration::from_secs(5), Some("hello from stdin"))
        .await
        .unwrap();
    assert!(result.combined.contains("hello from stdin"));
}
