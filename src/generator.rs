use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::error::GenerationError;
use crate::graph::{Project, ProjectGraph, Target};
use crate::manifest::Product;
use crate::options::{BuildConfiguration, GenerationDirectory, GenerationOptions};

const STATE_DIR: &str = ".workgen";
const DERIVED_DIR: &str = "Derived";

/// Emits workspace artifacts for a loaded graph.
pub trait WorkspaceGenerating {
    fn generate(
        &self,
        root: &Path,
        graph: &ProjectGraph,
        options: GenerationOptions,
        directory: GenerationDirectory,
    ) -> Result<(), GenerationError>;
}

/// Writes the workspace as JSON descriptions on the local filesystem.
#[derive(Debug, Default)]
pub struct FsWorkspaceGenerator;

#[derive(Debug, Serialize)]
struct WorkspaceDescription {
    name: String,
    configuration: BuildConfiguration,
    projects: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ProjectDescription {
    name: String,
    configuration: BuildConfiguration,
    targets: Vec<TargetDescription>,
}

#[derive(Debug, Serialize)]
struct TargetDescription {
    name: String,
    product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle_id: Option<String>,
    sources: Vec<String>,
    dependencies: Vec<DependencyDescription>,
    settings: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct DependencyDescription {
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationRecord {
    version: u8,
    generated_at: String,
    configuration: BuildConfiguration,
    directory: GenerationDirectory,
    workspace: String,
    projects: Vec<String>,
}

impl WorkspaceGenerating for FsWorkspaceGenerator {
    fn generate(
        &self,
        root: &Path,
        graph: &ProjectGraph,
        options: GenerationOptions,
        directory: GenerationDirectory,
    ) -> Result<(), GenerationError> {
        validate_topology(graph)?;

        let configuration = options.build_configuration;
        let mut generated = Vec::new();
        for project in graph.projects.values() {
            let project_dir = project_output_dir(project, directory);
            let description = describe_project(graph, project, configuration);
            write_json(&project_dir.join("project.json"), &description)?;
            debug!(project = %project.name, path = %project_dir.display(), "generated project");
            generated.push(relative_path(&project_dir, root));
        }

        let name = workspace_name(root, graph);
        let workspace_dir = root.join(format!("{name}.workspace"));
        write_json(
            &workspace_dir.join("contents.json"),
            &WorkspaceDescription {
                name: name.clone(),
                configuration,
                projects: generated.clone(),
            },
        )?;

        let record = GenerationRecord {
            version: 1,
            generated_at: now_rfc3339(),
            configuration,
            directory,
            workspace: relative_path(&workspace_dir, root),
            projects: generated,
        };
        write_json(&root.join(STATE_DIR).join("generation.json"), &record)?;

        Ok(())
    }
}

fn validate_topology(graph: &ProjectGraph) -> Result<(), GenerationError> {
    let mut names: BTreeMap<&str, &Path> = BTreeMap::new();
    for project in graph.projects.values() {
        if let Some(first) = names.insert(project.name.as_str(), project.path.as_path()) {
            return Err(GenerationError::DuplicateProjectName {
                name: project.name.clone(),
                first: first.to_path_buf(),
                second: project.path.clone(),
            });
        }
    }

    for project in graph.projects.values() {
        for target in &project.targets {
            for dependency in &target.dependencies {
                let Some((_, other)) = graph.target(dependency) else {
                    continue;
                };
                if !can_depend_on(target.product, other.product) {
                    return Err(GenerationError::InvalidDependency {
                        target: target.name.clone(),
                        dependency: other.name.clone(),
                        reason: format!(
                            "{} products cannot be linked",
                            product_label(other.product)
                        ),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Only libraries are linkable; a unit test bundle may additionally be hosted by an app.
fn can_depend_on(dependent: Product, dependency: Product) -> bool {
    dependency.is_linkable() || (dependent == Product::UnitTests && dependency == Product::App)
}

fn product_label(product: Product) -> &'static str {
    match product {
        Product::App => "app",
        Product::Framework => "framework",
        Product::StaticLibrary => "static_library",
        Product::DynamicLibrary => "dynamic_library",
        Product::UnitTests => "unit_tests",
        Product::CommandLineTool => "command_line_tool",
    }
}

fn project_output_dir(project: &Project, directory: GenerationDirectory) -> PathBuf {
    let base = match directory {
        GenerationDirectory::Manifest => project.path.clone(),
        GenerationDirectory::Derived => project.path.join(DERIVED_DIR),
    };
    base.join(format!("{}.project", project.name))
}

fn describe_project(
    graph: &ProjectGraph,
    project: &Project,
    configuration: BuildConfiguration,
) -> ProjectDescription {
    let settings = merged_settings(project, configuration);
    let targets = project
        .targets
        .iter()
        .map(|target| describe_target(graph, project, target, &settings))
        .collect();

    ProjectDescription {
        name: project.name.clone(),
        configuration,
        targets,
    }
}

fn describe_target(
    graph: &ProjectGraph,
    project: &Project,
    target: &Target,
    settings: &BTreeMap<String, String>,
) -> TargetDescription {
    let dependencies = target
        .dependencies
        .iter()
        .map(|dependency| DependencyDescription {
            target: dependency.target.clone(),
            project: (dependency.project != project.path)
                .then(|| graph.projects.get(&dependency.project))
                .flatten()
                .map(|other| other.name.clone()),
        })
        .collect();

    TargetDescription {
        name: target.name.clone(),
        product: target.product,
        bundle_id: target.bundle_id.clone(),
        sources: target
            .sources
            .iter()
            .map(|source| relative_path(source, &project.path))
            .collect(),
        dependencies,
        settings: settings.clone(),
    }
}

/// `base` settings overlaid with the selected configuration's settings.
fn merged_settings(
    project: &Project,
    configuration: BuildConfiguration,
) -> BTreeMap<String, String> {
    let mut settings = project.settings.base.clone();
    let overrides = match configuration {
        BuildConfiguration::Debug => &project.settings.debug,
        BuildConfiguration::Release => &project.settings.release,
    };
    settings.extend(overrides.iter().map(|(key, value)| (key.clone(), value.clone())));
    settings
}

fn workspace_name(root: &Path, graph: &ProjectGraph) -> String {
    graph
        .entry()
        .map(|project| project.name.clone())
        .or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "Workspace".to_string())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GenerationError> {
    let mut json = serde_json::to_vec_pretty(value).map_err(|source| GenerationError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    json.push(b'\n');

    if fs::read(path).is_ok_and(|existing| existing == json) {
        debug!(path = %path.display(), "unchanged; skipping write");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    fs::write(path, json).map_err(|source| io_error(path, source))
}

/// Lexical path of `path` relative to `base`, with `/` separators.
fn relative_path(path: &Path, base: &Path) -> String {
    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();
    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(base_components[common..].iter().map(|_| "..".to_string()));
    parts.extend(
        path_components[common..]
            .iter()
            .map(|component| component.as_os_str().to_string_lossy().to_string()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GenerationError {
    GenerationError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
