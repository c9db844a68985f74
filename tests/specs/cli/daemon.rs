use crate::prelude::Project;

#[test]
fn status_reports_no_state_before_any_run() {
    let project = Project::empty();
    project.jug(&["session", "create", "feat-x", "x"]).passes();
    project
        .jug(&["daemon", "status", "feat-x"])
        .passes()
        .stdout_has("no daemon state recorded");
}

#[test]
fn pause_then_resume_round_trips_through_the_control_file() {
    let project = Project::empty();
    project.jug(&["session", "create", "feat-x", "x"]).passes();
    project.jug(&["daemon", "pause", "feat-x"]).passes().stdout_has("Pause");
    project.jug(&["daemon", "resume", "feat-x"]).passes().stdout_has("Resume");
}
