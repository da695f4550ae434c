//! On-disk `Project.yaml` format.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphLoadError;

pub const MANIFEST_FILE: &str = "Project.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<TargetManifest>,
    #[serde(default)]
    pub settings: SettingsManifest,
    #[serde(default)]
    pub up: Vec<RequirementManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetManifest {
    pub name: String,
    pub product: Product,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyManifest {
    pub target: String,
    /// Directory of another project, relative to this one.
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsManifest {
    #[serde(default)]
    pub base: BTreeMap<String, String>,
    #[serde(default)]
    pub debug: BTreeMap<String, String>,
    #[serde(default)]
    pub release: BTreeMap<String, String>,
}

/// One entry under `up:`. Exactly one of the fields is expected.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequirementManifest {
    /// Executable that must be resolvable on PATH.
    #[serde(default)]
    pub tool: Option<String>,
    /// File or directory that must exist, relative to the project.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    App,
    Framework,
    StaticLibrary,
    DynamicLibrary,
    UnitTests,
    CommandLineTool,
}

impl Product {
    /// Products other targets may link against.
    pub fn is_linkable(self) -> bool {
        matches!(
            self,
            Product::Framework | Product::StaticLibrary | Product::DynamicLibrary
        )
    }
}

pub fn read_manifest(project_dir: &Path) -> Result<ProjectManifest, GraphLoadError> {
    let path = project_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(GraphLoadError::ManifestNotFound(path));
    }

    let contents = fs::read_to_string(&path).map_err(|source| GraphLoadError::Read {
        path: path.clone(),
        source,
    })?;

    parse_manifest(&contents).map_err(|message| GraphLoadError::Parse { path, message })
}

pub fn parse_manifest(contents: &str) -> Result<ProjectManifest, String> {
    serde_yaml_bw::from_str(contents).map_err(|err| err.to_string())
}
