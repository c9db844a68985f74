// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn create_then_show_roundtrips() {
    let dir = tempdir().unwrap();
    let store = JuggleStore::open(dir.path()).unwrap();
    handle(
        SessionCommand::Create {
            id: "design".to_string(),
            description: "design work".to_string(),
            context: Some("focus on the API surface".to_string()),
            default_model: "large".to_string(),
        },
        &store,
    )
    .unwrap();

    let session = store.sessions.load_session("design").unwrap().unwrap();
    assert_eq!(session.description, "design work");
    assert_eq!(session.context.as_deref(), Some("focus on the API surface"));
    assert_eq!(session.default_model, ModelSize::Large);
}

#[test]
fn show_unknown_session_errors() {
    let dir = tempdir().unwrap();
    let store = JuggleStore::open(dir.path()).unwrap();
    let err = handle(SessionCommand::Show { id: "missing".to_string() }, &store).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
