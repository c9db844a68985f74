// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! VCS backend selection cascade: per-ball override > CLI flag > project
//! config > global config > auto-detect from directory markers > default git.
//!
//! Project/global config loading is out of scope here; callers pass in
//! whatever they already resolved from config, or `None`.

use std::path::Path;

use crate::git::GitAdapter;
use crate::jj::JjAdapter;
use crate::adapter::VcsAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    Jj,
}

impl VcsKind {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Some(VcsKind::Git),
            "jj" | "jujutsu" => Some(VcsKind::Jj),
            _ => None,
        }
    }

    pub fn adapter(self) -> Box<dyn VcsAdapter> {
        match self {
            VcsKind::Git => Box::new(GitAdapter),
            VcsKind::Jj => Box::new(JjAdapter),
        }
    }
}

/// Resolve which backend to use, trying each source of the cascade in
/// order and falling back to directory-marker auto-detection, then git.
pub fn select_vcs_kind(
    ball_override: Option<&str>,
    cli_flag: Option<&str>,
    project_config: Option<&str>,
    global_config: Option<&str>,
    project_dir: &Path,
) -> VcsKind {
    for candidate in [ball_override, cli_flag, project_config, global_config] {
        if let Some(kind) = candidate.and_then(VcsKind::parse) {
            return kind;
        }
    }
    auto_detect(project_dir).unwrap_or(VcsKind::Git)
}

fn auto_detect(project_dir: &Path) -> Option<VcsKind> {
    if project_dir.join(".jj").is_dir() {
        Some(VcsKind::Jj)
    } else if project_dir.join(".git").exists() {
        Some(VcsKind::Git)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;
