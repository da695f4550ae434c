mod support;

use support::{write_file, write_manifest};
use tempfile::TempDir;
use workgen::error::GraphLoadError;
use workgen::graph::{GraphLoading, ManifestGraphLoader, TargetRef};
use workgen::manifest::Product;

const APP_MANIFEST: &str = r#"
name: App
targets:
  - name: App
    product: app
    bundle_id: io.example.app
    sources: [Sources/App]
    dependencies:
      - target: AppKit
      - project: ../Core
        target: Core
  - name: AppKit
    product: framework
    sources: [Sources/AppKit]
settings:
  base:
    SWIFT_VERSION: "5.0"
  release:
    OPTIMIZE: speed
up:
  - tool: swiftlint
"#;

const CORE_MANIFEST: &str = r#"
name: Core
targets:
  - name: Core
    product: framework
    sources: [Sources]
"#;

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_manifest(&tmp.path().join("App"), APP_MANIFEST);
    write_manifest(&tmp.path().join("Core"), CORE_MANIFEST);
    write_file(tmp.path(), "App/Sources/App/main.swift", "");
    write_file(tmp.path(), "App/Sources/App/Views/Root.swift", "");
    write_file(tmp.path(), "App/Sources/App/.DS_Store", "");
    write_file(tmp.path(), "App/Sources/AppKit/Kit.swift", "");
    write_file(tmp.path(), "Core/Sources/Core.swift", "");
    tmp
}

#[test]
fn loads_projects_across_dependencies() {
    let tmp = workspace();
    let app_dir = tmp.path().join("App");

    let graph = ManifestGraphLoader.load(&app_dir).unwrap();

    assert_eq!(graph.entry_path, app_dir);
    assert_eq!(graph.projects.len(), 2);
    let app = graph.entry().unwrap();
    assert_eq!(app.name, "App");
    assert_eq!(app.requirements.len(), 1);
    assert_eq!(app.requirements[0].tool.as_deref(), Some("swiftlint"));
    assert_eq!(
        app.settings.base.get("SWIFT_VERSION").map(String::as_str),
        Some("5.0")
    );

    let target = app.target("App").unwrap();
    assert_eq!(target.product, Product::App);
    assert_eq!(target.bundle_id.as_deref(), Some("io.example.app"));
    assert_eq!(
        target.sources,
        vec![
            app_dir.join("Sources/App/Views/Root.swift"),
            app_dir.join("Sources/App/main.swift"),
        ]
    );
    assert_eq!(
        target.dependencies,
        vec![
            TargetRef {
                project: app_dir.clone(),
                target: "AppKit".to_string(),
            },
            TargetRef {
                project: tmp.path().join("Core"),
                target: "Core".to_string(),
            },
        ]
    );

    let core = graph.projects.get(&tmp.path().join("Core")).unwrap();
    assert_eq!(
        core.targets[0].sources,
        vec![tmp.path().join("Core/Sources/Core.swift")]
    );
}

#[test]
fn missing_manifest_is_reported() {
    let tmp = TempDir::new().unwrap();
    let err = ManifestGraphLoader.load(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        GraphLoadError::ManifestNotFound(path) if path.ends_with("Project.yaml")
    ));
}

#[test]
fn missing_dependency_project_is_reported() {
    let tmp = TempDir::new().unwrap();
    write_manifest(&tmp.path().join("App"), APP_MANIFEST);

    let err = ManifestGraphLoader.load(&tmp.path().join("App")).unwrap_err();
    let core = tmp.path().join("Core");
    assert!(matches!(
        err,
        GraphLoadError::ManifestNotFound(path) if path.starts_with(&core)
    ));
}

#[test]
fn malformed_manifest_is_a_parse_error() {
    let tmp = TempDir::new().unwrap();
    write_manifest(tmp.path(), "name: App\ntargets:\n  - name: App\n    product: spaceship\n");

    let err = ManifestGraphLoader.load(tmp.path()).unwrap_err();
    assert!(matches!(err, GraphLoadError::Parse { .. }));
}

#[test]
fn unknown_target_is_reported() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        tmp.path(),
        r#"
name: App
targets:
  - name: App
    product: app
    dependencies:
      - target: Missing
"#,
    );

    let err = ManifestGraphLoader.load(tmp.path()).unwrap_err();
    match err {
        GraphLoadError::MissingTarget {
            project,
            target,
            missing,
        } => {
            assert_eq!(project, "App");
            assert_eq!(target, "App");
            assert_eq!(missing, "Missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_targets_are_rejected() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        tmp.path(),
        r#"
name: App
targets:
  - name: Kit
    product: framework
  - name: Kit
    product: static_library
"#,
    );

    let err = ManifestGraphLoader.load(tmp.path()).unwrap_err();
    assert!(matches!(err, GraphLoadError::DuplicateTarget { .. }));
}

#[test]
fn dependency_cycles_are_rejected() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        &tmp.path().join("A"),
        r#"
name: A
targets:
  - name: A
    product: framework
    dependencies:
      - project: ../B
        target: B
"#,
    );
    write_manifest(
        &tmp.path().join("B"),
        r#"
name: B
targets:
  - name: B
    product: framework
    dependencies:
      - project: ../A
        target: A
"#,
    );

    let err = ManifestGraphLoader.load(&tmp.path().join("A")).unwrap_err();
    match err {
        GraphLoadError::Cycle(path) => assert_eq!(path, vec!["A/A", "B/B", "A/A"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_source_directories_are_skipped() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        tmp.path(),
        "name: App\ntargets:\n  - name: App\n    product: app\n    sources: [Nowhere]\n",
    );

    let graph = ManifestGraphLoader.load(tmp.path()).unwrap();
    assert!(graph.entry().unwrap().targets[0].sources.is_empty());
}

#[test]
fn project_names_must_be_a_single_component() {
    let names = ["../../escaped", "nested/name", "back\\\\slash", "..", "\"  \""];
    for name in names {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("a/b");
        write_manifest(&root, &format!("name: {name}\n"));

        let err = ManifestGraphLoader.load(&root).unwrap_err();
        assert!(
            matches!(err, GraphLoadError::InvalidProjectName { .. }),
            "unexpected error for {name}: {err}"
        );
    }
}

#[test]
fn plain_project_names_are_accepted() {
    let tmp = TempDir::new().unwrap();
    write_manifest(tmp.path(), "name: My App.v2\n");

    let graph = ManifestGraphLoader.load(tmp.path()).unwrap();
    assert_eq!(graph.entry().unwrap().name, "My App.v2");
}
