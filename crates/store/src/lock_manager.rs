// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory cross-process locks keyed by session-id or ball-id.
//!
//! Two disjoint families: session-locks and ball-locks. Holding one never
//! blocks the other, even for the "same" logical entity — per-ball
//! parallelism within a session is the design goal.

use std::path::PathBuf;

use jug_core::{Clock, JugglerError, LockInfo, LockKey, Result};

use crate::file_lock::{is_pid_alive, FileLock};

/// A held lock; releasing is done by dropping the handle (or calling
/// [`LockHandle::release`], which is idempotent).
pub struct LockHandle {
    info_path: PathBuf,
    inner: Option<FileLock>,
}

impl LockHandle {
    /// Release the lock. Calling this more than once, or dropping after
    /// calling it, is a no-op.
    pub fn release(&mut self) {
        if self.inner.take().is_some() {
            let _ = std::fs::remove_file(&self.info_path);
        }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct LockManager {
    root: PathBuf,
}

impl LockManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Attempt to acquire `key`, non-blocking.
    ///
    /// On failure, reads the holder's metadata file (if present) and probes
    /// whether that PID is still alive on this host.
    pub fn acquire(&self, key: &LockKey, clock: &dyn Clock) -> Result<LockHandle> {
        let sentinel = self.root.join(key.sentinel_relpath());
        let info_path = self.root.join(key.info_relpath());

        match FileLock::try_acquire(&sentinel)? {
            Some(mut lock) => {
                let info = LockInfo {
                    pid: std::process::id(),
                    hostname: hostname(),
                    acquired_at: clock.now(),
                };
                let json = serde_json::to_vec(&info)?;
                lock.write_all(&json)?;
                Ok(LockHandle {
                    info_path,
                    inner: Some(lock),
                })
            }
            None => Err(self.locked_error(key, &info_path)),
        }
    }

    fn locked_error(&self, key: &LockKey, info_path: &PathBuf) -> JugglerError {
        let key_str = key.sentinel_relpath();
        match std::fs::read_to_string(info_path) {
            Ok(contents) => match serde_json::from_str::<LockInfo>(&contents) {
                Ok(info) => JugglerError::Locked {
                    key: key_str,
                    holder_pid: info.pid,
                    holder_host: info.hostname,
                    holder_alive: is_pid_alive(info.pid),
                },
                Err(_) => JugglerError::Locked {
                    key: key_str,
                    holder_pid: 0,
                    holder_host: String::new(),
                    holder_alive: false,
                },
            },
            Err(_) => JugglerError::Locked {
                key: key_str,
                holder_pid: 0,
                holder_host: String::new(),
                holder_alive: false,
            },
        }
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
#[path = "lock_manager_tests.rs"]
mod tests;
