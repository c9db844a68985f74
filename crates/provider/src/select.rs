// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-kind selection cascade.

use std::sync::Arc;

use crate::adapter::ProviderAdapter;
use crate::claude::ClaudeAdapter;
use crate::codex::CodexAdapter;
use crate::which::which_binary;

/// The two concrete assistant CLI backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Claude,
    Codex,
}

impl ProviderKind {
    /// Parse a config/CLI string, case-insensitively. Unrecognized strings
    /// return `None` so callers can fall through the cascade rather than
    /// hard error (an unknown provider string is a config-invalid warning,
    /// not a fatal error, until nothing in the cascade resolves).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Some(Self::Claude),
            "codex" => Some(Self::Codex),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
        }
    }

    /// Construct the concrete adapter for this backend.
    pub fn adapter(&self) -> Arc<dyn ProviderAdapter> {
        match self {
            Self::Claude => Arc::new(ClaudeAdapter),
            Self::Codex => Arc::new(CodexAdapter),
        }
    }
}

/// Resolve which provider backend to use, following the precedence:
/// CLI flag > per-ball override > project config > global config >
/// auto-detect (whichever binary is on PATH) > default (`claude`).
pub fn select_provider_kind(
    cli_flag: Option<&str>,
    ball_override: Option<&str>,
    project_config: Option<&str>,
    global_config: Option<&str>,
) -> ProviderKind {
    for candidate in [cli_flag, ball_override, project_config, global_config] {
        if let Some(kind) = candidate.and_then(ProviderKind::parse) {
            return kind;
        }
    }
    auto_detect()
}

fn auto_detect() -> ProviderKind {
    if which_binary("claude") {
        ProviderKind::Claude
    } else if which_binary("codex") {
        ProviderKind::Codex
    } else {
        ProviderKind::Claude
    }
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;
