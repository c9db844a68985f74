// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session metadata and the per-session files the engine reads and writes
//! in the course of a loop invocation: progress log, last captured output,
//! and the assistant's own status write.
//!
//! The `_all` directory (storage spelling of the meta-session) is created
//! lazily, the first time it is needed.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use jug_core::{meta_session, JugglerError, Result, Session};

use crate::file_lock::FileLock;

pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dir_for(&self, id: &str) -> PathBuf {
        self.root.join("sessions").join(meta_session::to_storage(id))
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.dir_for(id).join("session.json")
    }

    fn acquire(&self, path: &Path) -> Result<FileLock> {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        loop {
            if let Some(lock) = FileLock::try_acquire(&lock_path)? {
                return Ok(lock);
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    /// Public path to a session's storage directory, for callers (the
    /// daemon control surface) that need to locate its files directly.
    pub fn session_dir(&self, id: &str) -> PathBuf {
        self.dir_for(id)
    }

    /// Create the session's storage directory, lazily, and persist its metadata.
    pub fn create_session(&self, session: &Session) -> Result<()> {
        let dir = self.dir_for(&session.id);
        fs::create_dir_all(&dir)?;
        let path = self.session_path(&session.id);
        let _lock = self.acquire(&path)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load session metadata; for the meta-session, a missing file is not
    /// an error (the meta-session always exists implicitly).
    pub fn load_session(&self, id: &str) -> Result<Option<Session>> {
        let path = self.session_path(id);
        match File::open(&path) {
            Ok(file) => {
                let session = serde_json::from_reader(BufReader::new(file))?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_session(&self, session: &Session) -> Result<()> {
        if self.load_session(&session.id)?.is_none() {
            return Err(JugglerError::not_found("session", session.id.clone()));
        }
        self.create_session(session)
    }

    /// Append a line to the session's progress log, creating it if absent.
    pub fn append_progress(&self, id: &str, line: &str) -> Result<()> {
        let dir = self.dir_for(id);
        fs::create_dir_all(&dir)?;
        let path = dir.join("progress.txt");
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Number of lines currently in the progress log; the engine's baseline
    /// for signal-growth validation.
    pub fn progress_line_count(&self, id: &str) -> Result<usize> {
        let path = self.dir_for(id).join("progress.txt");
        match File::open(path) {
            Ok(file) => Ok(BufReader::new(file).lines().count()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort write of the most recent captured agent output.
    pub fn write_last_output(&self, id: &str, output: &str) -> Result<()> {
        let dir = self.dir_for(id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("last_output.txt"), output)?;
        Ok(())
    }

    /// Read the assistant's own status write, if one is present.
    pub fn read_agent_update(&self, id: &str) -> Result<Option<String>> {
        let path = self.dir_for(id).join("agent-update.txt");
        match fs::read_to_string(path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
