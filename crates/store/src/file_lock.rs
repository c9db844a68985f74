// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory exclusive file locking shared by mutating store operations and
//! the lock manager's session/ball locks.
//!
//! The lock is acquired on the sentinel file BEFORE it is truncated or
//! written, so a lock attempt never races a live holder's contents away.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// A held exclusive lock on a sentinel file. Dropping it releases the OS
/// lock; the file itself is left in place (the caller owns its lifecycle).
pub struct FileLock {
    file: std::fs::File,
    path: PathBuf,
}

impl FileLock {
    /// Attempt to acquire the lock at `path`, non-blocking.
    ///
    /// Creates the sentinel file (and its parent directory) if absent.
    /// Returns `Ok(None)` if another process already holds it.
    pub fn try_acquire(path: &Path) -> io::Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                file,
                path: path.to_owned(),
            })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate and rewrite the sentinel's contents while holding the lock.
    pub fn write_all(&mut self, contents: &[u8]) -> io::Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(contents)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Probe whether a process is still alive on this host.
///
/// Uses `kill(pid, 0)` semantics via `libc`-free signal 0 delivery: on Unix,
/// sending signal 0 fails with `ESRCH` iff the process does not exist.
#[cfg(unix)]
pub fn is_pid_alive(pid: u32) -> bool {
    // Checking /proc avoids a libc dependency purely for a liveness probe.
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(unix))]
pub fn is_pid_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
#[path = "file_lock_tests.rs"]
mod tests;
