// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn complete_without_commit_message() {
    let out = extract_signal("all done\n<promise>COMPLETE</promise>\n");
    assert_eq!(
        out,
        Some(Signal::Complete {
            commit_message: None
        })
    );
}

#[test]
fn complete_with_commit_message() {
    let out = extract_signal("<promise>COMPLETE: feat(x): b-1 - add thing</promise>");
    assert_eq!(
        out,
        Some(Signal::Complete {
            commit_message: Some("feat(x): b-1 - add thing".into())
        })
    );
}

#[test]
fn continue_with_commit_message() {
    let out = extract_signal("<promise>CONTINUE: fix: b-1 - x</promise>");
    assert_eq!(
        out,
        Some(Signal::Continue {
            commit_message: Some("fix: b-1 - x".into())
        })
    );
}

#[test]
fn blocked_requires_reason() {
    let out = extract_signal("<promise>BLOCKED: waiting on human input</promise>");
    assert_eq!(
        out,
        Some(Signal::Blocked {
            reason: "waiting on human input".into()
        })
    );
}

#[test]
fn blocked_without_reason_is_not_a_signal() {
    assert_eq!(extract_signal("<promise>BLOCKED</promise>"), None);
}

#[test]
fn marker_is_case_sensitive() {
    assert_eq!(extract_signal("<promise>complete</promise>"), None);
}

#[test]
fn marker_position_independent_within_prose() {
    let text = "Thinking out loud about the change...\nOk here we go.\n<promise>CONTINUE</promise>\nmore trailing text";
    assert_eq!(
        extract_signal(text),
        Some(Signal::Continue {
            commit_message: None
        })
    );
}

#[test]
fn no_marker_returns_none() {
    assert_eq!(extract_signal("just some plain output"), None);
}

#[test]
fn unrecognized_body_returns_none() {
    assert_eq!(extract_signal("<promise>WHATEVER</promise>"), None);
}
