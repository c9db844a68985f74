// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Teed subprocess execution for headless provider runs.
//!
//! Unlike a plain `Command::output()` capture, each stdout/stderr line is
//! echoed to the orchestrator's own terminal as it arrives, in addition to
//! being appended to the buffer returned to the caller.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Result of a teed subprocess run.
pub struct TeedOutput {
    pub combined: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Spawn `cmd`, teeing stdout and stderr to the terminal while capturing
/// both into a single interleaved buffer. A zero `timeout` means no deadline.
/// When `stdin_data` is given, it is written to the child's stdin and the
/// pipe is then closed so the child sees EOF.
pub async fn run_teed(
    mut cmd: Command,
    timeout: Duration,
    stdin_data: Option<&str>,
) -> std::io::Result<TeedOutput> {
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if stdin_data.is_some() {
        cmd.stdin(Stdio::piped());
    }

    let mut child = cmd.spawn()?;
    // Stdio::piped() was set above, so these handles are always present.
    #[allow(clippy::expect_used)]
    let stdout = child.stdout.take().expect("stdout piped");
    #[allow(clippy::expect_used)]
    let stderr = child.stderr.take().expect("stderr piped");

    let stdout_task = tokio::spawn(tee_stream(stdout, false));
    let stderr_task = tokio::spawn(tee_stream(stderr, true));

    if let Some(data) = stdin_data {
        // stdin_data.is_some() is exactly the condition that set Stdio::piped() above.
        #[allow(clippy::expect_used)]
        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin.write_all(data.as_bytes()).await?;
        drop(stdin);
    }

    let (exit_code, timed_out) = if timeout.is_zero() {
        let status = child.wait().await?;
        (status.code(), false)
    } else {
        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => (status?.code(), false),
            Err(_elapsed) => {
                let _ = child.start_kill();
                let status = child.wait().await?;
                (status.code(), true)
            }
        }
    };

    let stdout_buf = stdout_task.await.unwrap_or_default();
    let stderr_buf = stderr_task.await.unwrap_or_default();
    let mut combined = stdout_buf;
    combined.push_str(&stderr_buf);

    Ok(TeedOutput {
        combined,
        exit_code,
        timed_out,
    })
}

async fn tee_stream<R: AsyncRead + Unpin>(reader: R, is_stderr: bool) -> String {
    let mut lines = BufReader::new(reader).lines();
    let mut buf = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        if is_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        buf.push_str(&line);
        buf.push('\n');
    }
    buf
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
