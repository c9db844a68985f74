use crate::prelude::Project;

#[test]
fn create_then_show_roundtrips() {
    let project = Project::empty();
    project
        .jug(&["session", "create", "feat-x", "build feature x", "--default-model", "large"])
        .passes();
    project
        .jug(&["session", "show", "feat-x"])
        .passes()
        .stdout_has("build feature x")
        .stdout_has("large");
}

#[test]
fn show_unknown_session_fails() {
    let project = Project::empty();
    project.jug(&["session", "show", "missing"]).fails().stderr_has("not found");
}
