// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable, append-oriented storage of balls.
//!
//! Balls live in `balls.jsonl`, one JSON record per line, with completed
//! balls moved to a parallel `archive/balls.jsonl`. Every mutating
//! operation takes an exclusive advisory lock on a sibling `.lock` file;
//! readers take no lock and tolerate partially-written records by skipping
//! unparseable lines.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use jug_core::{Ball, BallId, JugglerError, Result};
use tracing::warn;

use crate::file_lock::FileLock;

const ACTIVE_FILE: &str = "balls.jsonl";
const ARCHIVE_FILE: &str = "archive/balls.jsonl";

pub struct BallStore {
    root: PathBuf,
}

impl BallStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn active_path(&self) -> PathBuf {
        self.root.join(ACTIVE_FILE)
    }

    fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE)
    }

    fn lock_path_for(path: &Path) -> PathBuf {
        let mut p = path.as_os_str().to_owned();
        p.push(".lock");
        PathBuf::from(p)
    }

    fn acquire(&self, path: &Path) -> Result<FileLock> {
        let lock_path = Self::lock_path_for(path);
        loop {
            if let Some(lock) = FileLock::try_acquire(&lock_path)? {
                return Ok(lock);
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    /// Append a ball to the active file. Caller must ensure `b.id` is unique.
    pub fn append_ball(&self, b: &Ball) -> Result<()> {
        let path = self.active_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let _lock = self.acquire(&path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut line = serde_json::to_vec(b)?;
        line.push(b'\n');
        file.write_all(&line)?;
        file.sync_all()?;
        Ok(())
    }

    /// Load every active ball in file order. Unparseable lines are skipped
    /// with a warning; corruption past a bad line is recoverable.
    pub fn load_balls(&self) -> Result<Vec<Ball>> {
        load_records(&self.active_path())
    }

    /// Load every archived (completed) ball.
    pub fn load_archived(&self) -> Result<Vec<Ball>> {
        load_records(&self.archive_path())
    }

    /// Rewrite the active file with `b`'s fields replacing the existing
    /// record of the same id. Fails with `not-found` if absent.
    pub fn update_ball(&self, b: &Ball) -> Result<()> {
        let path = self.active_path();
        let _lock = self.acquire(&path)?;
        let mut balls = load_records(&path)?;
        let Some(slot) = balls.iter_mut().find(|existing| existing.id == b.id) else {
            return Err(JugglerError::not_found("ball", b.id.as_str()));
        };
        *slot = b.clone();
        rewrite_records(&path, &balls)
    }

    /// Move a ball from the active file to the archive file. The archive
    /// write happens before the active rewrite; if the active rewrite
    /// fails, the archive append is rolled back best-effort.
    pub fn archive_ball(&self, b: &Ball) -> Result<()> {
        let active_path = self.active_path();
        let archive_path = self.archive_path();
        let _active_lock = self.acquire(&active_path)?;
        let _archive_lock = self.acquire(&archive_path)?;

        let archived_len_before = fs::metadata(&archive_path).map(|m| m.len()).unwrap_or(0);
        if let Some(parent) = archive_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut archive_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&archive_path)?;
        let mut line = serde_json::to_vec(b)?;
        line.push(b'\n');
        archive_file.write_all(&line)?;
        archive_file.sync_all()?;
        drop(archive_file);

        let mut balls = load_records(&active_path)?;
        let before = balls.len();
        balls.retain(|existing| existing.id != b.id);
        if balls.len() == before {
            // rollback: truncate the archive append back to its prior length
            if let Ok(file) = File::options().write(true).open(&archive_path) {
                let _ = file.set_len(archived_len_before);
            }
            return Err(JugglerError::not_found("ball", b.id.as_str()));
        }
        if let Err(e) = rewrite_records(&active_path, &balls) {
            if let Ok(file) = File::options().write(true).open(&archive_path) {
                let _ = file.set_len(archived_len_before);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Move a ball back from the archive to the active file, resetting it
    /// to `pending` and clearing completion fields.
    pub fn unarchive_ball(&self, id: &BallId) -> Result<Ball> {
        let active_path = self.active_path();
        let archive_path = self.archive_path();
        let _active_lock = self.acquire(&active_path)?;
        let _archive_lock = self.acquire(&archive_path)?;

        let mut archived = load_records(&archive_path)?;
        let before = archived.len();
        let Some(mut ball) = archived.iter().find(|b| &b.id == id).cloned() else {
            return Err(JugglerError::not_found("ball", id.as_str()));
        };
        archived.retain(|b| &b.id != id);
        debug_assert_eq!(archived.len(), before - 1);

        ball.state = jug_core::BallState::Pending;
        ball.blocked_reason = None;
        ball.completed_at = None;
        ball.completion_note = None;

        rewrite_records(&archive_path, &archived)?;

        let mut active = load_records(&active_path)?;
        active.push(ball.clone());
        rewrite_records(&active_path, &active)?;
        Ok(ball)
    }

    /// Resolve a full or short ball id against the active set.
    ///
    /// Tries an exact match first. On miss, tries a prefix match against
    /// every ball's derived short id. With `strict`, multiple prefix
    /// matches return an `ambiguous` error carrying the match list; without
    /// it, ties are broken by the most recently active ball.
    pub fn resolve_ball_id(&self, input: &str, strict: bool) -> Result<BallId> {
        let balls = self.load_balls()?;
        if let Some(b) = balls.iter().find(|b| b.id.as_str() == input) {
            return Ok(b.id.clone());
        }

        let mut matches: Vec<&Ball> = balls
            .iter()
            .filter(|b| b.short_id().starts_with(input))
            .collect();

        match matches.len() {
            0 => Err(JugglerError::not_found("ball", input)),
            1 => Ok(matches.remove(0).id.clone()),
            _ if strict => Err(JugglerError::Ambiguous {
                prefix: input.to_string(),
                matches: matches.iter().map(|b| b.id.as_str().to_string()).collect(),
            }),
            _ => {
                matches.sort_by_key(|b| b.last_activity);
                // match on matches.len() above already excluded the 0 case.
                #[allow(clippy::expect_used)]
                let most_recent = matches.last().expect("non-empty checked above");
                Ok(most_recent.id.clone())
            }
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<Ball>> {
    let Ok(file) = File::open(path) else {
        return Ok(Vec::new());
    };
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Ball>(trimmed) {
            Ok(mut b) => {
                b.normalize_legacy_fields();
                out.push(b);
            }
            Err(e) => {
                warn!(path = %path.display(), line = lineno, error = %e, "skipping unparseable ball record");
            }
        }
    }
    Ok(out)
}

fn rewrite_records(path: &Path, balls: &[Ball]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        for b in balls {
            let mut line = serde_json::to_vec(b)?;
            line.push(b'\n');
            file.write_all(&line)?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "ball_store_tests.rs"]
mod tests;
