#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use workgen::environment::EnvironmentChecking;
use workgen::error::{EnvironmentCheckError, GenerationError, GraphLoadError};
use workgen::generator::WorkspaceGenerating;
use workgen::graph::{GraphLoading, ProjectGraph};
use workgen::options::{GenerationDirectory, GenerationOptions};
use workgen::printer::MessageSink;

pub fn write_manifest(dir: &Path, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Project.yaml"), contents).unwrap();
}

pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

pub fn empty_graph(path: &Path) -> ProjectGraph {
    ProjectGraph {
        entry_path: path.to_path_buf(),
        projects: BTreeMap::new(),
    }
}

pub struct FakeGraphLoader {
    pub log: CallLog,
    pub fail: bool,
}

impl GraphLoading for FakeGraphLoader {
    fn load(&self, root: &Path) -> Result<ProjectGraph, GraphLoadError> {
        self.log.push(format!("load {}", root.display()));
        if self.fail {
            return Err(GraphLoadError::ManifestNotFound(root.join("Project.yaml")));
        }
        Ok(empty_graph(root))
    }
}

pub struct FakeEnvironment {
    pub log: CallLog,
    pub result: Result<bool, EnvironmentCheckError>,
}

impl EnvironmentChecking for FakeEnvironment {
    fn is_satisfied(&self, _graph: &ProjectGraph) -> Result<bool, EnvironmentCheckError> {
        self.log.push("check");
        self.result.clone()
    }
}

pub struct FakeGenerator {
    pub log: CallLog,
    pub fail: bool,
}

impl WorkspaceGenerating for FakeGenerator {
    fn generate(
        &self,
        root: &Path,
        _graph: &ProjectGraph,
        options: GenerationOptions,
        directory: GenerationDirectory,
    ) -> Result<(), GenerationError> {
        self.log.push(format!(
            "generate {} {} {:?}",
            root.display(),
            options.build_configuration,
            directory
        ));
        if self.fail {
            return Err(GenerationError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::other("disk full"),
            });
        }
        Ok(())
    }
}

pub struct RecordingSink {
    pub log: CallLog,
}

impl MessageSink for RecordingSink {
    fn warning(&self, text: &str) {
        self.log.push(format!("warning {text}"));
    }

    fn success(&self, text: &str) {
        self.log.push(format!("success {text}"));
    }
}

/// An absolute directory that is never touched by the fakes.
pub fn cwd() -> PathBuf {
    std::env::temp_dir().join("workgen-fake").join("app")
}
