//! ferry CLI - Build and package c-toxcore

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ferry::core::errors::{Phase, RecipeError};
use ferry::core::version::BUILD_DESCRIPTION;
use ferry::util::diagnostic::{emit, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();
    let source = source_dir(&cli.command);

    if let Err(e) = run(cli) {
        emit(&report(&e, source.as_deref()), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ferry=debug")
    } else {
        EnvFilter::new("ferry=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Config(args) => commands::config::execute(args),
        Commands::Create(args) => commands::create::execute(args, cli.verbose),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn source_dir(command: &Commands) -> Option<std::path::PathBuf> {
    match command {
        Commands::Inspect(args) => Some(args.recipe.source.clone()),
        Commands::Config(args) => Some(args.recipe.source.clone()),
        Commands::Create(args) => Some(args.recipe.source.clone()),
        Commands::Completions(_) => None,
    }
}

/// Build the diagnostic printed for a failed command.
fn report(err: &anyhow::Error, source: Option<&std::path::Path>) -> Diagnostic {
    match err.downcast_ref::<RecipeError>() {
        Some(recipe_err) => {
            let diag = recipe_err.to_diagnostic();
            match (recipe_err.phase(), source) {
                (Phase::Version, Some(source)) => diag.with_location(source.join(BUILD_DESCRIPTION)),
                _ => diag,
            }
        }
        None => {
            let diag = Diagnostic::error(format!("{:#}", err));
            if err.chain().any(|cause| cause.to_string().contains(BUILD_DESCRIPTION)) {
                diag.with_suggestion(ferry::util::diagnostic::suggestions::NO_BUILD_DESCRIPTION)
            } else {
                diag
            }
        }
    }
}
