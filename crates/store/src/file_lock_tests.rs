// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn acquire_creates_parent_dir_and_sentinel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/sentinel.lock");
    let lock = FileLock::try_acquire(&path).unwrap();
    assert!(lock.is_some());
    assert!(path.exists());
}

#[test]
fn second_acquire_in_same_process_sees_contention() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sentinel.lock");
    let first = FileLock::try_acquire(&path).unwrap();
    assert!(first.is_some());
    let second = FileLock::try_acquire(&path).unwrap();
    assert!(second.is_none());
}

#[test]
fn releasing_allows_reacquire() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sentinel.lock");
    let first = FileLock::try_acquire(&path).unwrap();
    drop(first);
    let second = FileLock::try_acquire(&path).unwrap();
    assert!(second.is_some());
}

#[test]
fn write_all_overwrites_prior_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sentinel.lock");
    let mut lock = FileLock::try_acquire(&path).unwrap().unwrap();
    lock.write_all(b"first").unwrap();
    lock.write_all(b"second").unwrap();
    drop(lock);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "second");
}

#[test]
fn current_process_pid_is_alive() {
    assert!(is_pid_alive(std::process::id()));
}
