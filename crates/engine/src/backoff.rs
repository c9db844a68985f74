// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait-time formulas for the three retried-same-iteration failure modes.

use std::time::Duration;

use rand::Rng;

use crate::config::{RATE_LIMIT_BASE_WAIT, RATE_LIMIT_MAX_WAIT};

/// `min(60s, 2^attempt s)`. `attempt` is 1 on the first crash retry.
pub fn crash_wait(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt).min(60);
    Duration::from_secs(secs)
}

/// `retry_after + 5s` when the provider gave a hint, else exponential
/// backoff from 30s doubling per attempt and capped at 16 minutes.
/// `attempt` is 0 on the first rate-limit retry.
pub fn rate_limit_wait(retry_after: Option<Duration>, attempt: u32) -> Duration {
    if let Some(hint) = retry_after {
        return hint + Duration::from_secs(5);
    }
    let secs = RATE_LIMIT_BASE_WAIT.as_secs().saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_secs(secs.min(RATE_LIMIT_MAX_WAIT.as_secs()))
}

/// Overload backoff is the configured fixed interval, not exponential.
pub fn overload_wait(configured_interval: Duration) -> Duration {
    configured_interval
}

/// Whether accumulating `additional` wait on top of `already_waited` would
/// exceed `max_wait`. A zero `max_wait` means unbounded.
pub fn exceeds_max_wait(already_waited: Duration, additional: Duration, max_wait: Duration) -> bool {
    !max_wait.is_zero() && already_waited + additional > max_wait
}

/// `base + uniform(-fuzz, +fuzz)`, clamped to zero. A zero `fuzz` returns
/// `base` unchanged; a zero `base` with nonzero `fuzz` still returns zero,
/// since the feature is only meaningful once a base delay exists.
pub fn calculate_fuzzy_delay(base: Duration, fuzz: Duration) -> Duration {
    if base.is_zero() || fuzz.is_zero() {
        return base;
    }
    let base_secs = base.as_secs_f64();
    let fuzz_secs = fuzz.as_secs_f64();
    let offset = rand::rng().random_range(-fuzz_secs..=fuzz_secs);
    Duration::from_secs_f64((base_secs + offset).max(0.0))
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
