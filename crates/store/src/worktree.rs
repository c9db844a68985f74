// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worktree redirection: a `.juggle/link` sentinel file containing a single
//! path redirects all storage to a main repository's `.juggle` directory.
//!
//! Resolved once, at store construction time. Callers never re-check the
//! sentinel per-operation.

use std::path::{Path, PathBuf};

use jug_core::Result;

/// Resolve the effective `.juggle` storage root for `project_root`.
///
/// If `<project_root>/.juggle/link` exists, its (trimmed) single-line
/// contents name the main repository's root; the storage root becomes
/// `<that path>/.juggle`. Otherwise the storage root is `<project_root>/.juggle`.
pub fn resolve_store_root(project_root: &Path) -> Result<PathBuf> {
    let local = project_root.join(".juggle");
    let link_path = local.join("link");
    match std::fs::read_to_string(&link_path) {
        Ok(contents) => {
            let target = contents.trim();
            Ok(PathBuf::from(target).join(".juggle"))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(local),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
