//! Error taxonomy for the generate workflow.
//!
//! Each collaborator owns one error type. [`CommandError`] wraps them
//! transparently so the orchestrator can pass failures through unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// A user-supplied flag value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("invalid value '{value}' for argument '{argument}': expected one of {allowed}")]
    InvalidValue {
        argument: String,
        value: String,
        allowed: String,
    },
}

/// Failures while reading manifests and assembling the project graph.
#[derive(Debug, Error)]
pub enum GraphLoadError {
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid project name '{name}' in {}: expected a single path component", .path.display())]
    InvalidProjectName { path: PathBuf, name: String },

    #[error("duplicate target {target} in project {project}")]
    DuplicateTarget { project: String, target: String },

    #[error("target {target} in project {project} depends on missing target {missing}")]
    MissingTarget {
        project: String,
        target: String,
        missing: String,
    },

    #[error("dependency cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("failed to list sources under {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },
}

/// Failures while querying setup requirements. An unmet requirement is not one of these.
#[derive(Debug, Clone, Error)]
pub enum EnvironmentCheckError {
    #[error("invalid setup requirement in project {project}: {message}")]
    InvalidRequirement { project: String, message: String },

    #[error("failed to look up tool {tool}: {message}")]
    Lookup { tool: String, message: String },
}

/// Failures while emitting the workspace.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("projects at {} and {} are both named {name}", .first.display(), .second.display())]
    DuplicateProjectName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("target {target} cannot depend on {dependency}: {reason}")]
    InvalidDependency {
        target: String,
        dependency: String,
        reason: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a failed generate invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),

    #[error(transparent)]
    GraphLoad(#[from] GraphLoadError),

    #[error(transparent)]
    EnvironmentCheck(#[from] EnvironmentCheckError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
