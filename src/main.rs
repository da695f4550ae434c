use std::env;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workgen::cli::Cli;
use workgen::printer::Verbosity;
use workgen::run;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(Verbosity::from_flags(cli.quiet, cli.verbose));

    let cwd = env::current_dir().context("failed to determine current directory")?;
    run(cli, &cwd)
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env("WORKGEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
