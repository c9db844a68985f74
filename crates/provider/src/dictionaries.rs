// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Case-insensitive substring dictionaries used to classify assistant
//! output and wrapped errors as rate-limit or overload-exhaustion signals.
//!
//! Deliberately fuzzy: a wrapped error that happens to contain a dictionary
//! substring (e.g. the word "capacity") is classified as rate-limit even
//! when the real cause was unrelated. This is preserved for compatibility
//! with existing assistant behavior rather than tightened.

use std::time::Duration;

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "too many requests",
    "429",
    "please retry",
    "capacity",
];

const OVERLOAD_PATTERNS: &[&str] = &[
    "overloaded",
    "overload_error",
    "server is temporarily unavailable",
    "service unavailable",
    "529",
];

/// Whether `output` or `error` matches the rate-limit dictionary.
pub fn is_rate_limited(output: &str, error: Option<&str>) -> bool {
    matches_any(output, RATE_LIMIT_PATTERNS) || error.is_some_and(|e| matches_any(e, RATE_LIMIT_PATTERNS))
}

/// Whether `output` or `error` matches the overload dictionary. Per the
/// contract, this is gated on a nonzero exit code or a wrapped error, so a
/// legitimate assistant response that merely quotes this text in prose
/// doesn't trigger a false positive.
pub fn is_overload_exhausted(output: &str, error: Option<&str>, exit_nonzero: bool) -> bool {
    if !exit_nonzero && error.is_none() {
        return false;
    }
    matches_any(output, OVERLOAD_PATTERNS) || error.is_some_and(|e| matches_any(e, OVERLOAD_PATTERNS))
}

fn matches_any(haystack: &str, patterns: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    patterns.iter().any(|p| lower.contains(p))
}

/// Best-effort extraction of a "retry after N seconds/minutes/hours" hint.
pub fn parse_retry_after(text: &str) -> Option<Duration> {
    let lower = text.to_ascii_lowercase();
    let idx = lower.find("retry after").or_else(|| lower.find("retry-after"))?;
    let rest = &lower[idx..];

    let mut digits = String::new();
    let mut chars = rest.chars().skip_while(|c| !c.is_ascii_digit());
    for c in chars.by_ref() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            break;
        }
    }
    if digits.is_empty() {
        return None;
    }
    let n: u64 = digits.parse().ok()?;

    let after_digits = &rest[rest.find(&digits)? + digits.len()..];
    let unit_slice = after_digits.trim_start();
    if unit_slice.starts_with("hour") {
        Some(Duration::from_secs(n * 3600))
    } else if unit_slice.starts_with("minute") {
        Some(Duration::from_secs(n * 60))
    } else if unit_slice.starts_with("second") {
        Some(Duration::from_secs(n))
    } else {
        Some(Duration::from_secs(n))
    }
}

#[cfg(test)]
#[path = "dictionaries_tests.rs"]
mod tests;
