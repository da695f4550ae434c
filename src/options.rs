use std::fmt;

use serde::Serialize;

/// Named variant selecting which settings apply during generation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildConfiguration {
    #[default]
    Debug,
    Release,
}

impl BuildConfiguration {
    pub const ALL: [BuildConfiguration; 2] = [BuildConfiguration::Debug, BuildConfiguration::Release];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
        }
    }

    /// Matches an already lower-cased name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|config| config.as_str() == name)
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct GenerationOptions {
    pub build_configuration: BuildConfiguration,
}

impl GenerationOptions {
    pub fn new(build_configuration: BuildConfiguration) -> Self {
        Self {
            build_configuration,
        }
    }
}

/// Where generated project files are placed relative to their manifest.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationDirectory {
    /// Next to `Project.yaml`.
    Manifest,
    /// Under `Derived/` inside the project directory.
    Derived,
}
