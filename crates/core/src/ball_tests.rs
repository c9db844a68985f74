// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn ball(state: BallState, tags: Vec<&str>) -> Ball {
    let now = Utc::now();
    Ball {
        id: BallId::new("b-1"),
        title: "do the thing".into(),
        context: String::new(),
        acceptance_criteria: vec![],
        priority: Priority::Medium,
        model_size: ModelSize::Blank,
        model_override: None,
        agent_provider: None,
        state,
        blocked_reason: None,
        tags: tags.into_iter().map(String::from).collect(),
        depends_on: vec![],
        working_dir: "/tmp/proj".into(),
        created_at: now,
        last_activity: now,
        completed_at: None,
        completion_note: None,
        update_count: 0,
        beads_issues: vec![],
        beads_primary: None,
        intent: None,
    }
}

#[test]
fn terminal_states() {
    assert!(BallState::Complete.is_terminal());
    assert!(BallState::Researched.is_terminal());
    assert!(!BallState::Pending.is_terminal());
    assert!(!BallState::InProgress.is_terminal());
    assert!(!BallState::Blocked.is_terminal());
}

#[test]
fn workable_pending_and_in_progress_always() {
    assert!(ball(BallState::Pending, vec![]).is_workable(false));
    assert!(ball(BallState::InProgress, vec![]).is_workable(false));
}

#[test]
fn blocked_workable_only_when_interactive_or_targeted() {
    assert!(!ball(BallState::Blocked, vec![]).is_workable(false));
    assert!(ball(BallState::Blocked, vec![]).is_workable(true));
}

#[test]
fn terminal_states_never_workable() {
    assert!(!ball(BallState::Complete, vec![]).is_workable(true));
    assert!(!ball(BallState::Researched, vec![]).is_workable(true));
}

#[test]
fn in_session_matches_tag() {
    let b = ball(BallState::Pending, vec!["feat-x", "urgent"]);
    assert!(b.in_session("feat-x"));
    assert!(!b.in_session("feat-y"));
}

#[test]
fn in_session_meta_matches_everything() {
    let b = ball(BallState::Pending, vec!["feat-x"]);
    assert!(b.in_session("all"));
    assert!(b.in_session("_all"));
}

#[test]
fn legacy_intent_maps_to_title_when_title_empty() {
    let mut b = ball(BallState::Pending, vec![]);
    b.title = String::new();
    b.intent = Some("legacy title".into());
    b.normalize_legacy_fields();
    assert_eq!(b.title, "legacy title");
    assert!(b.intent.is_none());
}

#[test]
fn legacy_intent_does_not_override_existing_title() {
    let mut b = ball(BallState::Pending, vec![]);
    b.intent = Some("legacy title".into());
    b.normalize_legacy_fields();
    assert_eq!(b.title, "do the thing");
}

#[test]
fn short_id_truncates() {
    let mut b = ball(BallState::Pending, vec![]);
    b.id = BallId::new("abcdefghijklmnop");
    assert_eq!(b.short_id(), "abcdefgh");
}
