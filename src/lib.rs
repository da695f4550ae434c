pub mod args;
pub mod cli;
pub mod environment;
pub mod error;
pub mod generate;
pub mod generator;
pub mod graph;
pub mod manifest;
pub mod options;
pub mod printer;

use std::path::Path;

use anyhow::Result;
use cli::{Cli, Commands};
use environment::RequirementChecker;
use generate::GenerateCommand;
use generator::FsWorkspaceGenerator;
use graph::ManifestGraphLoader;
use printer::{TerminalPrinter, Verbosity};

/// Wires the production collaborators and dispatches the parsed command.
pub fn run(cli: Cli, cwd: &Path) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    match cli.command {
        Commands::Generate(args) => {
            let command = GenerateCommand::new(
                Box::new(ManifestGraphLoader),
                Box::new(RequirementChecker),
                Box::new(FsWorkspaceGenerator),
                Box::new(TerminalPrinter::new(verbosity)),
            );
            command.run(&args, cwd)?;
        }
    }

    Ok(())
}
