use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::args::normalize;
use crate::error::GraphLoadError;
use crate::manifest::{
    MANIFEST_FILE, Product, ProjectManifest, RequirementManifest, SettingsManifest,
    TargetManifest, read_manifest,
};

/// Produces a project graph rooted at a directory containing `Project.yaml`.
pub trait GraphLoading {
    fn load(&self, root: &Path) -> Result<ProjectGraph, GraphLoadError>;
}

#[derive(Debug, Clone)]
pub struct ProjectGraph {
    pub entry_path: PathBuf,
    pub projects: BTreeMap<PathBuf, Project>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub path: PathBuf,
    pub name: String,
    pub targets: Vec<Target>,
    pub settings: SettingsManifest,
    pub requirements: Vec<RequirementManifest>,
}

#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub product: Product,
    pub bundle_id: Option<String>,
    /// Absolute source file paths, sorted.
    pub sources: Vec<PathBuf>,
    pub dependencies: Vec<TargetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TargetRef {
    pub project: PathBuf,
    pub target: String,
}

impl ProjectGraph {
    pub fn entry(&self) -> Option<&Project> {
        self.projects.get(&self.entry_path)
    }

    pub fn target(&self, reference: &TargetRef) -> Option<(&Project, &Target)> {
        let project = self.projects.get(&reference.project)?;
        let target = project.target(&reference.target)?;
        Some((project, target))
    }
}

impl Project {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }
}

/// Loads `Project.yaml` manifests, following cross-project dependencies.
#[derive(Debug, Default)]
pub struct ManifestGraphLoader;

impl GraphLoading for ManifestGraphLoader {
    fn load(&self, root: &Path) -> Result<ProjectGraph, GraphLoadError> {
        let entry_path = normalize(root);
        let mut projects: BTreeMap<PathBuf, Project> = BTreeMap::new();
        let mut queue = VecDeque::from([entry_path.clone()]);

        while let Some(dir) = queue.pop_front() {
            if projects.contains_key(&dir) {
                continue;
            }

            let manifest = read_manifest(&dir)?;
            let project = build_project(&dir, manifest)?;
            debug!(
                path = %dir.display(),
                name = %project.name,
                targets = project.targets.len(),
                "loaded project manifest"
            );

            for dependency in project.targets.iter().flat_map(|target| &target.dependencies) {
                if dependency.project != dir && !projects.contains_key(&dependency.project) {
                    queue.push_back(dependency.project.clone());
                }
            }
            projects.insert(dir, project);
        }

        let graph = ProjectGraph {
            entry_path,
            projects,
        };
        check_references(&graph)?;
        check_cycles(&graph)?;

        Ok(graph)
    }
}

fn build_project(dir: &Path, manifest: ProjectManifest) -> Result<Project, GraphLoadError> {
    if !is_valid_project_name(&manifest.name) {
        return Err(GraphLoadError::InvalidProjectName {
            path: dir.join(MANIFEST_FILE),
            name: manifest.name,
        });
    }

    let mut seen = BTreeSet::new();
    let mut targets = Vec::with_capacity(manifest.targets.len());

    for target in &manifest.targets {
        if !seen.insert(target.name.clone()) {
            return Err(GraphLoadError::DuplicateTarget {
                project: manifest.name.clone(),
                target: target.name.clone(),
            });
        }
        targets.push(build_target(dir, target)?);
    }

    Ok(Project {
        path: dir.to_path_buf(),
        name: manifest.name,
        targets,
        settings: manifest.settings,
        requirements: manifest.up,
    })
}

/// Project names become output directory names, so they must stay a single path component.
fn is_valid_project_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

fn build_target(dir: &Path, target: &TargetManifest) -> Result<Target, GraphLoadError> {
    let dependencies = target
        .dependencies
        .iter()
        .map(|dependency| TargetRef {
            project: match dependency.project.as_deref() {
                Some(project) => normalize(&dir.join(project)),
                None => dir.to_path_buf(),
            },
            target: dependency.target.clone(),
        })
        .collect();

    Ok(Target {
        name: target.name.clone(),
        product: target.product,
        bundle_id: target.bundle_id.clone(),
        sources: collect_sources(dir, &target.sources)?,
        dependencies,
    })
}

fn collect_sources(dir: &Path, entries: &[String]) -> Result<Vec<PathBuf>, GraphLoadError> {
    let mut sources = BTreeSet::new();

    for entry in entries {
        let root = normalize(&dir.join(entry));
        if !root.exists() {
            warn!(path = %root.display(), "source path does not exist; skipping");
            continue;
        }

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for item in walker {
            let item = item.map_err(|err| GraphLoadError::Walk {
                path: root.clone(),
                message: err.to_string(),
            })?;
            if item.file_type().is_file() {
                sources.insert(item.into_path());
            }
        }
    }

    Ok(sources.into_iter().collect())
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn check_references(graph: &ProjectGraph) -> Result<(), GraphLoadError> {
    for project in graph.projects.values() {
        for target in &project.targets {
            for dependency in &target.dependencies {
                if graph.target(dependency).is_none() {
                    let missing = match graph.projects.get(&dependency.project) {
                        Some(other) if other.path != project.path => {
                            format!("{}/{}", other.name, dependency.target)
                        }
                        _ => dependency.target.clone(),
                    };
                    return Err(GraphLoadError::MissingTarget {
                        project: project.name.clone(),
                        target: target.name.clone(),
                        missing,
                    });
                }
            }
        }
    }

    Ok(())
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn check_cycles(graph: &ProjectGraph) -> Result<(), GraphLoadError> {
    let mut marks: BTreeMap<TargetRef, Mark> = BTreeMap::new();
    let mut stack: Vec<TargetRef> = Vec::new();

    for project in graph.projects.values() {
        for target in &project.targets {
            let node = TargetRef {
                project: project.path.clone(),
                target: target.name.clone(),
            };
            visit(graph, node, &mut marks, &mut stack)?;
        }
    }

    Ok(())
}

fn visit(
    graph: &ProjectGraph,
    node: TargetRef,
    marks: &mut BTreeMap<TargetRef, Mark>,
    stack: &mut Vec<TargetRef>,
) -> Result<(), GraphLoadError> {
    match marks.get(&node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|entry| *entry == node).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..]
                .iter()
                .map(|entry| display_ref(graph, entry))
                .collect();
            cycle.push(display_ref(graph, &node));
            return Err(GraphLoadError::Cycle(cycle));
        }
        None => {}
    }

    marks.insert(node.clone(), Mark::Visiting);
    stack.push(node.clone());

    if let Some((_, target)) = graph.target(&node) {
        for dependency in &target.dependencies {
            visit(graph, dependency.clone(), marks, stack)?;
        }
    }

    stack.pop();
    marks.insert(node, Mark::Done);
    Ok(())
}

fn display_ref(graph: &ProjectGraph, reference: &TargetRef) -> String {
    match graph.projects.get(&reference.project) {
        Some(project) => format!("{}/{}", project.name, reference.target),
        None => reference.target.clone(),
    }
}
