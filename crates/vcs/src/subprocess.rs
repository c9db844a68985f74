// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helper shared by the git and jj backends.

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

/// Default timeout for a single VCS command invocation.
pub const VCS_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Run a subprocess command with a timeout, converting timeout expiry into
/// a descriptive error. The child is killed automatically on timeout via
/// the tokio `Child` drop implementation.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{description} failed: {io_err}")),
        Err(_elapsed) => Err(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
