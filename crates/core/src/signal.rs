// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `<promise>...</promise>` completion-signal protocol.
//!
//! Extraction is a tolerant, position-independent substring scan, not a
//! line-anchored regex: assistants sometimes interleave the marker within
//! explanatory prose, and tightening this would break real sessions.

use serde::{Deserialize, Serialize};

/// A parsed completion signal extracted from assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Complete { commit_message: Option<String> },
    Continue { commit_message: Option<String> },
    Blocked { reason: String },
}

const OPEN: &str = "<promise>";
const CLOSE: &str = "</promise>";

/// Scan `text` for the first well-known marker, case-sensitive, anywhere in
/// the buffer. Returns `None` if no marker is present or the body doesn't
/// match one of the three recognized forms.
pub fn extract_signal(text: &str) -> Option<Signal> {
    let start = text.find(OPEN)?;
    let body_start = start + OPEN.len();
    let end = text[body_start..].find(CLOSE)? + body_start;
    let body = text[body_start..end].trim();

    if let Some(rest) = body.strip_prefix("COMPLETE") {
        let commit_message = parse_colon_suffix(rest);
        return Some(Signal::Complete { commit_message });
    }
    if let Some(rest) = body.strip_prefix("CONTINUE") {
        let commit_message = parse_colon_suffix(rest);
        return Some(Signal::Continue { commit_message });
    }
    if let Some(rest) = body.strip_prefix("BLOCKED") {
        let reason = parse_colon_suffix(rest)?;
        return Some(Signal::Blocked { reason });
    }
    None
}

fn parse_colon_suffix(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':')?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
