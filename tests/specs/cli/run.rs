use crate::prelude::Project;

#[test]
fn run_fails_fast_when_no_provider_binary_is_on_path() {
    let project = Project::empty();
    project.jug(&["ball", "add", "x", "--tag", "all"]).passes();
    project
        .jug(&["run", "--session", "all", "--ignore-lock"])
        .fails()
        .stderr_has("not on PATH");
}
