// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine-wide error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Errors shared across the store, lock manager, VCS adapter, provider
/// adapter, and loop engine.
#[derive(Debug, Error)]
pub enum JugglerError {
    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("ambiguous id {prefix:?}: matches {matches:?}")]
    Ambiguous { prefix: String, matches: Vec<String> },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("locked by pid {holder_pid} on {holder_host} (alive={holder_alive}): {key}")]
    Locked {
        key: String,
        holder_pid: u32,
        holder_host: String,
        holder_alive: bool,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("overload retries exhausted")]
    OverloadExhausted,

    #[error("provider binary not on PATH: {0}")]
    ProviderUnavailable(String),

    #[error("assistant crashed: {0}")]
    Crash(String),

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JugglerError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, JugglerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
