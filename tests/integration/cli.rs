//! CLI tests driving the `stencil` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::TestProject;

fn stencil() -> Command {
    Command::cargo_bin("stencil").expect("binary builds")
}

#[test]
fn render_renders_the_manifest_jobs() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "config"
src-base = "templates"
dst-base = "generated"

[[group.job]]
src = "config.txt.tpl"
dst = "config.txt"
params = [{ key = "VERSION", value = "1.2.3" }]
"#,
        )
        .unwrap();
    project.write_file("templates/config.txt.tpl", "v=VERSION").unwrap();

    stencil()
        .current_dir(project.path())
        .args(["render", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rendered 1 template job"));

    assert_eq!(project.read_file("build/generated/config.txt").unwrap(), "v=1.2.3");
}

#[test]
fn render_fails_and_names_the_failing_node() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "broken"

[[group.job]]
src = "missing.tpl"
"#,
        )
        .unwrap();

    stencil()
        .current_dir(project.path())
        .args(["render", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stencil-missing.tpl"))
        .stderr(predicate::str::contains("failed to read template source"));
}

#[test]
fn render_reports_missing_manifest_with_suggestion() {
    let project = TestProject::new().unwrap();

    stencil()
        .current_dir(project.path())
        .args(["render", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest not found"))
        .stderr(predicate::str::contains("stencil.toml"));
}

#[test]
fn validate_accepts_a_good_manifest() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "ok"

[[group.job]]
src = "a.tpl"
"#,
        )
        .unwrap();
    project.write_file("a.tpl", "text").unwrap();

    stencil()
        .current_dir(project.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest ok"));
}

#[test]
fn validate_flags_unknown_engines_and_missing_sources() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "bad"

[[group.job]]
src = "missing.tpl"
engine = "mustache"
"#,
        )
        .unwrap();

    stencil()
        .current_dir(project.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown engine [mustache]"))
        .stderr(predicate::str::contains("source file missing"));
}

#[test]
fn validate_rejects_groups_without_jobs() {
    let project = TestProject::new().unwrap();
    project.write_manifest("[[group]]\nname = \"empty\"\n").unwrap();

    stencil()
        .current_dir(project.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no [[group.job]]"));
}

#[test]
fn list_emits_parsable_json() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
task-prefix = "tpl"

[[group]]
name = "config"

[[group.job]]
src = "a.tpl"
params = [{ key = "K", value = "V" }]
"#,
        )
        .unwrap();

    let output = stencil()
        .current_dir(project.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["task_prefix"], "tpl");
    assert_eq!(parsed["groups"][0]["name"], "config");
    assert_eq!(parsed["groups"][0]["jobs"][0]["engine"], "replace");
    assert_eq!(parsed["groups"][0]["jobs"][0]["params"][0]["key"], "K");
}

#[test]
fn list_table_shows_jobs() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "config"

[[group.job]]
src = "a.tpl"
dst = "a.txt"
"#,
        )
        .unwrap();

    stencil()
        .current_dir(project.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("a.tpl"))
        .stdout(predicate::str::contains("a.txt"));
}

#[test]
fn explicit_manifest_path_overrides_the_default() {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "configs/jobs.toml",
            r#"
[[group]]
name = "ok"

[[group.job]]
src = "a.tpl"
"#,
        )
        .unwrap();
    project.write_file("configs/a.tpl", "A").unwrap();

    stencil()
        .current_dir(project.path())
        .args(["render", "--no-progress", "--manifest", "configs/jobs.toml"])
        .assert()
        .success();

    // Project dir defaults to the manifest's directory.
    assert_eq!(project.read_file("configs/build/a.tpl").unwrap(), "A");
}
