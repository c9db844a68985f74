// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `jj` (Jujutsu) backend.
//!
//! Unlike git, jj's working copy is itself a commit: there is no separate
//! staging area, and "committing" means describing the current change and
//! starting a new empty one on top of it.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::adapter::{CommitResult, VcsAdapter};
use crate::subprocess::{run_with_timeout, VCS_COMMAND_TIMEOUT};

#[derive(Debug, Clone, Copy, Default)]
pub struct JjAdapter;

fn jj(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("jj");
    cmd.current_dir(dir).args(args);
    cmd
}

async fn run(dir: &Path, args: &[&str], description: &str) -> Result<(bool, String, String), String> {
    let output = run_with_timeout(jj(dir, args), VCS_COMMAND_TIMEOUT, description).await?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    Ok((output.status.success(), stdout, stderr))
}

#[async_trait]
impl VcsAdapter for JjAdapter {
    fn name(&self) -> &'static str {
        "jj"
    }

    async fn status(&self, dir: &Path) -> Result<String, String> {
        let (_, stdout, _) = run(dir, &["status"], "jj status").await?;
        Ok(stdout)
    }

    async fn has_changes(&self, dir: &Path) -> Result<bool, String> {
        let status = self.status(dir).await?;
        Ok(!status.contains("The working copy has no changes"))
    }

    async fn commit(&self, dir: &Path, message: &str) -> Result<CommitResult, String> {
        if !self.has_changes(dir).await? {
            let status_after = self.status(dir).await?;
            return Ok(CommitResult {
                success: true,
                commit_hash: None,
                status_after,
                error_message: None,
            });
        }

        let isolated_rev_before = self.get_current_revision(dir).await.ok();

        let (ok, _, err) = run(dir, &["commit", "-m", message], "jj commit").await?;
        let status_after = self.status(dir).await.unwrap_or_default();
        if !ok {
            return Ok(CommitResult {
                success: false,
                commit_hash: None,
                status_after,
                error_message: Some(err),
            });
        }

        Ok(CommitResult {
            success: true,
            commit_hash: isolated_rev_before,
            status_after,
            error_message: None,
        })
    }

    async fn describe_working_copy(&self, dir: &Path, message: &str) -> Result<(), String> {
        let (ok, _, err) = run(dir, &["describe", "-m", message], "jj describe").await?;
        if ok {
            Ok(())
        } else {
            Err(err)
        }
    }

    async fn isolate_and_reset(
        &self,
        dir: &Path,
        target_rev: Option<&str>,
    ) -> Result<String, String> {
        let isolated_rev = self.get_current_revision(dir).await?;
        let target = target_rev.unwrap_or("@-");
        let (ok, _, err) = run(dir, &["new", target], "jj new").await?;
        if !ok {
            return Err(err);
        }
        Ok(isolated_rev)
    }

    async fn get_current_revision(&self, dir: &Path) -> Result<String, String> {
        let (ok, stdout, stderr) = run(
            dir,
            &["log", "-r", "@", "--no-graph", "-T", "commit_id"],
            "jj log",
        )
        .await?;
        if ok {
            Ok(stdout.trim().to_string())
        } else {
            Err(stderr)
        }
    }
}

#[cfg(test)]
#[path = "jj_tests.rs"]
mod tests;
