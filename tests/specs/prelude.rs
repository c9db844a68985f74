//! Test helpers for behavioral specifications.
//!
//! Black-box DSL for driving the `jug` binary against a disposable project
//! directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::Path;
use std::process::Output;

use assert_cmd::Command;

/// Temporary project directory the CLI can be pointed at with `-C`.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Build a `jug` invocation rooted at this project.
    pub fn jug(&self, args: &[&str]) -> RunAssert {
        let mut cmd = Command::cargo_bin("jug").unwrap();
        cmd.arg("-C").arg(self.path()).args(args);
        let output = cmd.output().expect("jug should run");
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn passes(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            self.output.status.code(),
            self.stdout(),
            self.stderr()
        );
        self
    }

    pub fn fails(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected failure, but it passed\nstdout: {}",
            self.stdout()
        );
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let out = self.stdout();
        assert!(out.contains(expected), "stdout does not contain '{expected}'\nstdout: {out}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let err = self.stderr();
        assert!(err.contains(expected), "stderr does not contain '{expected}'\nstderr: {err}");
        self
    }
}
