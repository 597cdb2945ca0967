//! End-to-end library flow: manifest -> plugin -> task graph -> files.

use stencil::graph::TaskGraph;
use stencil::manifest::Manifest;
use stencil::project::{ProjectPaths, RecordedSourceRoots};

use crate::common::TestProject;

const MANIFEST: &str = r#"
[[group]]
name = "config"
src-base = "templates"
dst-base = "generated"

[[group.job]]
src = "config.txt.tpl"
dst = "config.txt"
params = [
    { key = "VERSION", value = "1.2.3" },
]

[[group.job]]
src = "banner.txt.tpl"
params = [
    { key = "NAME", value = "stencil" },
]
"#;

fn project_with_templates() -> TestProject {
    let project = TestProject::new().unwrap();
    project.write_manifest(MANIFEST).unwrap();
    project.write_file("templates/config.txt.tpl", "v=VERSION\n").unwrap();
    project.write_file("templates/banner.txt.tpl", "welcome to NAME\n").unwrap();
    project
}

async fn apply_and_run(project: &TestProject) -> stencil::graph::ExecutionReport {
    let manifest = Manifest::load(&project.path().join("stencil.toml")).unwrap();
    let plugin = manifest.into_plugin();
    let mut graph = TaskGraph::new();
    let mut compile = RecordedSourceRoots::default();
    let paths = ProjectPaths::new(project.path());
    let root = plugin.apply(&mut graph, &paths, &mut compile).unwrap();
    graph.run(root, 4).await
}

#[tokio::test]
async fn renders_all_jobs_through_the_root_node() {
    let project = project_with_templates();
    let report = apply_and_run(&project).await;
    assert!(report.is_success(), "failures: {:?}", report.failed);

    assert_eq!(project.read_file("build/generated/config.txt").unwrap(), "v=1.2.3\n");
    // Default destination: same relative path under the destination base.
    assert_eq!(
        project.read_file("build/generated/banner.txt.tpl").unwrap(),
        "welcome to stencil\n"
    );
    // Sources are untouched.
    assert_eq!(project.read_file("templates/config.txt.tpl").unwrap(), "v=VERSION\n");
}

#[tokio::test]
async fn rerunning_a_fresh_build_rerenders_unconditionally() {
    let project = project_with_templates();
    assert!(apply_and_run(&project).await.is_success());

    // Change the source; a new build invocation must pick it up (no cache).
    project.write_file("templates/config.txt.tpl", "version: VERSION\n").unwrap();
    assert!(apply_and_run(&project).await.is_success());
    assert_eq!(project.read_file("build/generated/config.txt").unwrap(), "version: 1.2.3\n");
}

#[tokio::test]
async fn a_missing_source_fails_its_node_but_not_siblings() {
    let project = TestProject::new().unwrap();
    project.write_manifest(MANIFEST).unwrap();
    // Only one of the two templates exists.
    project.write_file("templates/banner.txt.tpl", "welcome to NAME\n").unwrap();

    let report = apply_and_run(&project).await;
    assert!(!report.is_success());

    // The sibling job still rendered.
    assert!(project.has_file("build/generated/banner.txt.tpl"));
    assert!(!project.has_file("build/generated/config.txt"));

    // The leaf failed, and so did the group and root above it.
    let failed: Vec<&str> = report.failed.iter().map(|f| f.task.as_str()).collect();
    assert!(failed.contains(&"stencil-config.txt.tpl"), "failed: {failed:?}");
    assert!(failed.contains(&"stencil-config"));
    assert!(failed.contains(&"stencil"));
}

#[tokio::test]
async fn colliding_job_names_render_to_their_own_destinations() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
name = "dup"
src-base = "templates"
dst-base = "out"

[[group.job]]
src = "one/value.tpl"
params = [{ key = "X", value = "1" }]

[[group.job]]
src = "two/value.tpl"
params = [{ key = "X", value = "2" }]
"#,
        )
        .unwrap();
    project.write_file("templates/one/value.tpl", "X").unwrap();
    project.write_file("templates/two/value.tpl", "X").unwrap();

    let report = apply_and_run(&project).await;
    assert!(report.is_success(), "failures: {:?}", report.failed);

    // Both jobs registered (under distinct generated names) and rendered.
    assert_eq!(project.read_file("build/out/one/value.tpl").unwrap(), "1");
    assert_eq!(project.read_file("build/out/two/value.tpl").unwrap(), "2");
}

#[tokio::test]
async fn java_preset_renders_and_registers_the_generated_root() {
    let project = TestProject::new().unwrap();
    project
        .write_manifest(
            r#"
[[group]]
preset = "java"

[[group.job]]
src = "Version.java.tpl"
dst = "Version.java"
params = [{ key = "@VERSION@", value = "0.2.0" }]
"#,
        )
        .unwrap();
    project
        .write_file(
            "src/main/java-templates/Version.java.tpl",
            "public final class Version { static final String VALUE = \"@VERSION@\"; }\n",
        )
        .unwrap();

    let manifest = Manifest::load(&project.path().join("stencil.toml")).unwrap();
    let plugin = manifest.into_plugin();
    let mut graph = TaskGraph::new();
    let mut compile = RecordedSourceRoots::default();
    let paths = ProjectPaths::new(project.path());
    let root = plugin.apply(&mut graph, &paths, &mut compile).unwrap();

    assert_eq!(compile.roots(), &[project.path().join("build/generated/sourceTemplate/java")]);

    let report = graph.run(root, 2).await;
    assert!(report.is_success(), "failures: {:?}", report.failed);
    let rendered =
        project.read_file("build/generated/sourceTemplate/java/Version.java").unwrap();
    assert!(rendered.contains("\"0.2.0\""));
}
