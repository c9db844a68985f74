// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `git` backend.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::adapter::{CommitResult, VcsAdapter};
use crate::subprocess::{run_with_timeout, VCS_COMMAND_TIMEOUT};

#[derive(Debug, Clone, Copy, Default)]
pub struct GitAdapter;

fn git(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir).args(args);
    cmd
}

async fn run(dir: &Path, args: &[&str], description: &str) -> Result<(bool, String, String), String> {
    let output = run_with_timeout(git(dir, args), VCS_COMMAND_TIMEOUT, description).await?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    Ok((output.status.success(), stdout, stderr))
}

#[async_trait]
impl VcsAdapter for GitAdapter {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn status(&self, dir: &Path) -> Result<String, String> {
        let (_, stdout, _) = run(dir, &["status", "--porcelain"], "git status").await?;
        Ok(stdout)
    }

    async fn has_changes(&self, dir: &Path) -> Result<bool, String> {
        Ok(!self.status(dir).await?.trim().is_empty())
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

        let (add_ok, _, add_err) = run(dir, &["add", "-A"], "git add").await?;
        if !add_ok {
            return Ok(CommitResult {
                success: false,
                commit_hash: None,
                status_after: self.status(dir).await.unwrap_or_default(),
                error_message: Some(add_err),
            });
        }

        let (commit_ok, _, commit_err) = run(dir, &["commit", "-m", message], "git commit").await?;
        let status_after = self.status(dir).await.unwrap_or_default();
        if !commit_ok {
            return Ok(CommitResult {
                success: false,
                commit_hash: None,
                status_after,
                error_message: Some(commit_err),
            });
        }

        let hash = self.get_current_revision(dir).await.ok();
        Ok(CommitResult {
            success: true,
            commit_hash: hash,
            status_after,
            error_message: None,
        })
    }

    async fn describe_working_copy(&self, _dir: &Path, _message: &str) -> Result<(), String> {
        // git has no working-copy description concept; no-op.
        Ok(())
    }

    async fn isolate_and_reset(
        &self,
        dir: &Path,
        target_rev: Option<&str>,
    ) -> Result<String, String> {
        let target = match target_rev {
            Some(t) => t.to_string(),
            None => default_branch(dir).await?,
        };

        if self.has_changes(dir).await? {
            let (add_ok, _, add_err) = run(dir, &["add", "-A"], "git add").await?;
            if !add_ok {
                return Err(add_err);
            }
        }

        let (commit_ok, _, commit_err) = run(
            dir,
            &["commit", "-m", "BLOCKED: isolated changes", "--allow-empty"],
            "git commit (isolate)",
        )
        .await?;
        if !commit_ok {
            return Err(commit_err);
        }

        let isolated_rev = self.get_current_revision(dir).await?;

        let (reset_ok, _, reset_err) =
            run(dir, &["reset", "--hard", &target], "git reset --hard").await?;
        if !reset_ok {
            return Err(reset_err);
        }

        Ok(isolated_rev)
    }

    async fn get_current_revision(&self, dir: &Path) -> Result<String, String> {
        let (ok, stdout, stderr) = run(dir, &["rev-parse", "HEAD"], "git rev-parse").await?;
        if ok {
            Ok(stdout.trim().to_string())
        } else {
            Err(stderr)
        }
    }
}

async fn default_branch(dir: &Path) -> Result<String, String> {
    for candidate in ["main", "master"] {
        let (ok, _, _) = run(
            dir,
            &["rev-parse", "--verify", candidate],
            "git rev-parse --verify",
        )
        .await?;
        if ok {
            return Ok(candidate.to_string());
        }
    }
    Err("no main or master branch found".to_string())
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
