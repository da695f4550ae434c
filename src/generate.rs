//! The `generate` command.
//!
//! Resolves arguments, loads the project graph, checks setup requirements and
//! generates the workspace, stopping at the first failure. Collaborators are
//! injected so the workflow can run against fakes.

use std::path::Path;

use tracing::debug;

use crate::args::{resolve_configuration, resolve_path};
use crate::cli::GenerateArgs;
use crate::environment::EnvironmentChecking;
use crate::error::CommandError;
use crate::generator::WorkspaceGenerating;
use crate::graph::GraphLoading;
use crate::options::{GenerationDirectory, GenerationOptions};
use crate::printer::MessageSink;

pub const SETUP_WARNING: &str =
    "You can run 'workgen up' to install everything you need to run this project";
pub const SUCCESS_MESSAGE: &str = "Project generated.";

pub struct GenerateCommand {
    graph_loader: Box<dyn GraphLoading>,
    environment: Box<dyn EnvironmentChecking>,
    generator: Box<dyn WorkspaceGenerating>,
    printer: Box<dyn MessageSink>,
}

impl GenerateCommand {
    pub fn new(
        graph_loader: Box<dyn GraphLoading>,
        environment: Box<dyn EnvironmentChecking>,
        generator: Box<dyn WorkspaceGenerating>,
        printer: Box<dyn MessageSink>,
    ) -> Self {
        Self {
            graph_loader,
            environment,
            generator,
            printer,
        }
    }

    pub fn run(&self, args: &GenerateArgs, cwd: &Path) -> Result<(), CommandError> {
        let path = resolve_path(args.path.as_deref(), cwd);
        debug!(path = %path.display(), "resolved path");

        let config = resolve_configuration(args.config.as_deref())?;
        debug!(%config, "resolved configuration");

        let graph = self.graph_loader.load(&path)?;
        debug!(projects = graph.projects.len(), "loaded graph");

        if !self.environment.is_satisfied(&graph)? {
            self.printer.warning(SETUP_WARNING);
        }

        self.generator.generate(
            &path,
            &graph,
            GenerationOptions::new(config),
            GenerationDirectory::Manifest,
        )?;
        debug!("generated workspace");

        self.printer.success(SUCCESS_MESSAGE);
        Ok(())
    }
}
