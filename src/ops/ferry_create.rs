//! Implementation of `ferry config` and `ferry create`.
//!
//! A recipe evaluation is single-threaded and strictly sequential: options
//! are validated, cache variables generated, then configure, build, test and
//! install each block on one external invocation. Metadata is only exported
//! once all of them have succeeded.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::builder::cache_vars::{generate, BuildConfiguration};
use crate::builder::driver::{install, BuildDriver, DriverState};
use crate::builder::tool::BuildTool;
use crate::core::dependency::{requirements, Requirement};
use crate::core::errors::RecipeError;
use crate::core::options::OptionSet;
use crate::core::platform::PlatformContext;
use crate::core::recipe::Recipe;
use crate::ops::export::{PackageExporter, PackageInfo};

/// Everything derived from a recipe without running the build tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub reference: String,
    pub settings: PlatformContext,
    pub options: OptionSet,
    pub requires: Vec<Requirement>,
    pub cache_variables: BuildConfiguration,
}

/// Result of a successful `create`.
#[derive(Debug)]
pub struct CreateResult {
    pub info: PackageInfo,
    pub info_path: PathBuf,
    pub history: Vec<DriverState>,
}

/// Resolve options from config-file and command-line assignments.
///
/// Config assignments apply first so the command line wins.
pub fn resolve_options<C, L>(config: C, cli: L) -> Result<OptionSet, RecipeError>
where
    C: IntoIterator,
    C::Item: AsRef<str>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let mut options = OptionSet::default();
    for assignment in config {
        options.apply_assignment(assignment.as_ref())?;
    }
    for assignment in cli {
        options.apply_assignment(assignment.as_ref())?;
    }
    Ok(options)
}

/// Derive cache variables and requirements for one platform.
pub fn evaluate(recipe: &Recipe, options: &OptionSet, platform: &PlatformContext) -> Evaluation {
    Evaluation {
        reference: recipe.reference(),
        settings: *platform,
        options: *options,
        requires: requirements(platform),
        cache_variables: generate(options, platform),
    }
}

/// Configure, build, test, install and export the package.
///
/// Any failing step aborts the evaluation; no metadata is written unless
/// every step succeeded.
pub fn create<T: BuildTool>(
    recipe: &Recipe,
    options: &OptionSet,
    platform: &PlatformContext,
    tool: T,
) -> Result<CreateResult> {
    tracing::info!("creating {} ({})", recipe.reference(), platform);

    let config = generate(options, platform);

    let mut driver = BuildDriver::new(&tool, config, options.with_tests());
    let completion = driver.run()?;
    install(&tool, &completion)?;

    let info = PackageExporter::new(recipe, platform, options).export(&completion)?;
    let info_path = info.write(completion.install_prefix())?;
    tracing::info!("wrote {}", info_path.display());

    Ok(CreateResult {
        info,
        info_path,
        history: driver.history().to_vec(),
    })
}
