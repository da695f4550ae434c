use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "workgen")]
#[command(about = "Generate project workspaces from Project.yaml manifests", long_about = None)]
pub struct Cli {
    /// Show debug output from graph loading and generation.
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Suppress warning and success messages.
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generates a workspace to start working on the project.
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// The path where the project will be generated.
    #[arg(short, long)]
    pub path: Option<PathBuf>,
    /// The configuration that will be generated (debug or release).
    #[arg(short, long)]
    pub config: Option<String>,
}
