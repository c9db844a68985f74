// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock metadata and key types shared between the store crate's lock
//! manager and the engine's lock-selection policy.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Which namespace a lock key belongs to. The two families are disjoint:
/// holding a ball-lock does not prevent another process from holding the
/// session-lock of a session containing that ball, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockKey {
    Session(String),
    Ball(String),
}

impl LockKey {
    /// Relative path (under the store root) of the sentinel file this key locks.
    pub fn sentinel_relpath(&self) -> String {
        match self {
            LockKey::Session(id) => format!("sessions/{id}/agent.lock"),
            LockKey::Ball(id) => format!("balls/{id}.lock"),
        }
    }

    pub fn info_relpath(&self) -> String {
        format!("{}.info", self.sentinel_relpath())
    }
}

/// Holder metadata written alongside the OS-level advisory lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub hostname: String,
    pub acquired_at: Timestamp,
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
