use std::path::Path;

use tracing::{debug, info};

use crate::error::EnvironmentCheckError;
use crate::graph::{Project, ProjectGraph};
use crate::manifest::RequirementManifest;

/// Reports whether the setup requirements declared by a graph are satisfied.
pub trait EnvironmentChecking {
    fn is_satisfied(&self, graph: &ProjectGraph) -> Result<bool, EnvironmentCheckError>;
}

/// Checks `up:` entries: tools on PATH and paths on disk.
#[derive(Debug, Default)]
pub struct RequirementChecker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement<'a> {
    Tool(&'a str),
    Path(&'a str),
}

impl EnvironmentChecking for RequirementChecker {
    fn is_satisfied(&self, graph: &ProjectGraph) -> Result<bool, EnvironmentCheckError> {
        let mut satisfied = true;

        for project in graph.projects.values() {
            for entry in &project.requirements {
                let requirement = requirement(project, entry)?;
                if is_met(project, &requirement)? {
                    debug!(project = %project.name, ?requirement, "setup requirement met");
                } else {
                    info!(project = %project.name, ?requirement, "setup requirement not met");
                    satisfied = false;
                }
            }
        }

        Ok(satisfied)
    }
}

fn requirement<'a>(
    project: &Project,
    entry: &'a RequirementManifest,
) -> Result<Requirement<'a>, EnvironmentCheckError> {
    let invalid = |message: &str| EnvironmentCheckError::InvalidRequirement {
        project: project.name.clone(),
        message: message.to_string(),
    };

    match (entry.tool.as_deref(), entry.path.as_deref()) {
        (Some(tool), None) if !tool.trim().is_empty() => Ok(Requirement::Tool(tool.trim())),
        (None, Some(path)) if !path.trim().is_empty() => Ok(Requirement::Path(path.trim())),
        (Some(_), Some(_)) => Err(invalid("entry declares both tool and path")),
        (None, None) => Err(invalid("entry declares neither tool nor path")),
        _ => Err(invalid("entry has an empty value")),
    }
}

fn is_met(project: &Project, requirement: &Requirement<'_>) -> Result<bool, EnvironmentCheckError> {
    match requirement {
        Requirement::Tool(tool) => tool_available(tool),
        Requirement::Path(path) => Ok(project.path.join(Path::new(path)).exists()),
    }
}

fn tool_available(tool: &str) -> Result<bool, EnvironmentCheckError> {
    match which::which(tool) {
        Ok(path) => {
            debug!(tool, path = %path.display(), "resolved tool");
            Ok(true)
        }
        Err(which::Error::CannotFindBinaryPath) => Ok(false),
        Err(err) => Err(EnvironmentCheckError::Lookup {
            tool: tool.to_string(),
            message: err.to_string(),
        }),
    }
}
