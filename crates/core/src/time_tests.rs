// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone, Utc};

#[test]
fn system_clock_advances() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn fake_clock_holds_fixed_time_until_advanced() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    assert_eq!(clock.now(), start);
    assert_eq!(clock.now(), start);
}

#[test]
fn fake_clock_advance_moves_forward() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    clock.advance(Duration::seconds(30));
    assert_eq!(clock.now(), start + Duration::seconds(30));
}

#[test]
fn fake_clock_set_jumps_to_exact_instant() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    clock.set(later);
    assert_eq!(clock.now(), later);
}

#[test]
fn fake_clock_shared_across_clones() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    let clone = clock.clone();
    clock.advance(Duration::seconds(5));
    assert_eq!(clone.now(), start + Duration::seconds(5));
}
