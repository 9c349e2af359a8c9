//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// ferry - Build and package c-toxcore from its CMake source tree
#[derive(Parser)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show recipe metadata, options and requirements
    Inspect(InspectArgs),

    /// Print the CMake cache variables for a configuration
    Config(ConfigArgs),

    /// Configure, build, test, install and export the package
    Create(CreateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by every command that evaluates the recipe.
#[derive(Args)]
pub struct RecipeArgs {
    /// c-toxcore source tree (the directory with CMakeLists.txt)
    #[arg(long, default_value = ".", env = "FERRY_SOURCE")]
    pub source: PathBuf,

    /// Platform setting override (os, compiler, arch, build_type)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Option override (shared, with_tests)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Option override (shared, with_tests)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Build directory (defaults to <source>/build)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Install prefix (defaults to <build-dir>/package)
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// CMake generator (e.g. Ninja)
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Print the package info as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
