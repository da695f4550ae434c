use std::path::{Component, Path, PathBuf};

use crate::error::ArgumentError;
use crate::options::BuildConfiguration;

/// Resolves `--path` against `cwd`. Without an argument, returns `cwd` unchanged.
pub fn resolve_path(arg: Option<&Path>, cwd: &Path) -> PathBuf {
    match arg {
        Some(path) => normalize(&cwd.join(path)),
        None => cwd.to_path_buf(),
    }
}

pub fn resolve_configuration(arg: Option<&str>) -> Result<BuildConfiguration, ArgumentError> {
    let Some(raw) = arg else {
        return Ok(BuildConfiguration::default());
    };

    BuildConfiguration::from_name(&raw.to_lowercase()).ok_or_else(|| {
        ArgumentError::InvalidValue {
            argument: "config".to_string(),
            value: raw.to_string(),
            allowed: BuildConfiguration::ALL
                .iter()
                .map(|config| config.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    })
}

/// Lexically removes `.` and folds `..` without touching the filesystem.
/// `..` never climbs above the root or prefix.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}
