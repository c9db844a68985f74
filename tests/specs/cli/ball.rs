use crate::prelude::Project;

#[test]
fn add_then_list_shows_the_ball() {
    let project = Project::empty();
    project.jug(&["ball", "add", "write docs", "--tag", "all"]).passes();
    project.jug(&["ball", "list"]).passes().stdout_has("write docs");
}

#[test]
fn add_rejects_unknown_priority() {
    let project = Project::empty();
    project
        .jug(&["ball", "add", "x", "--priority", "whenever"])
        .fails()
        .stderr_has("unknown priority");
}

#[test]
fn set_state_to_blocked_without_reason_fails() {
    let project = Project::empty();
    let added = project.jug(&["ball", "add", "x", "--tag", "all"]).passes();
    let id = added.stdout().split_whitespace().nth(1).unwrap().to_string();
    project
        .jug(&["ball", "set-state", &id, "blocked"])
        .fails()
        .stderr_has("--reason");
}

#[test]
fn archive_then_unarchive_roundtrips() {
    let project = Project::empty();
    let added = project.jug(&["ball", "add", "x", "--tag", "all"]).passes();
    let id = added.stdout().split_whitespace().nth(1).unwrap().to_string();
    project.jug(&["ball", "set-state", &id, "complete"]).passes();
    project.jug(&["ball", "archive", &id]).passes();
    project.jug(&["ball", "list"]).passes().stdout().contains("x");
    project.jug(&["ball", "unarchive", &id]).passes();
}
