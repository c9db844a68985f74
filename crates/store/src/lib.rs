// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jug-store: durable ball/session storage plus cross-process locking for
//! the Juggler workload orchestrator.

mod ball_store;
mod file_lock;
mod lock_manager;
mod session_store;
mod worktree;

pub use ball_store::BallStore;
pub use file_lock::{is_pid_alive, FileLock};
pub use lock_manager::{LockHandle, LockManager};
pub use session_store::SessionStore;
pub use worktree::resolve_store_root;

use std::path::{Path, PathBuf};

use jug_core::Result;

/// The resolved `.juggle` storage root plus its three sub-stores, composed
/// once per project directory (after worktree-link resolution).
pub struct JuggleStore {
    pub root: PathBuf,
    pub balls: BallStore,
    pub sessions: SessionStore,
    pub locks: LockManager,
}

impl JuggleStore {
    pub fn open(project_root: &Path) -> Result<Self> {
        let root = resolve_store_root(project_root)?;
        Ok(Self {
            balls: BallStore::new(&root),
            sessions: SessionStore::new(&root),
            locks: LockManager::new(&root),
            root,
        })
    }
}
