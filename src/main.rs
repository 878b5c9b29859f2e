//! Jakartacheck CLI entry point.

use clap::Parser;
use jakartacheck::cli::{self, Cli, Commands, EXIT_ERROR};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jakartacheck=debug")
    } else {
        EnvFilter::try_from_env("JAKARTACHECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Lint(args) => cli::run_lint(args),
        Commands::Actions(args) => cli::run_actions(args),
        Commands::Fix(args) => cli::run_fix(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
