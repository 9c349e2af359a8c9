//! Command implementations

pub mod completions;
pub mod config;
pub mod create;
pub mod inspect;

use anyhow::{bail, Result};

use crate::cli::RecipeArgs;
use ferry::builder::cmake::is_cmake_project;
use ferry::core::platform::PlatformContext;
use ferry::core::recipe::Recipe;
use ferry::core::version::BUILD_DESCRIPTION;
use ferry::util::config::{global_config_path, load_config, project_config_path, Config};
use ferry::util::fs::normalize_path;

/// Recipe, merged configuration and target platform for one invocation.
pub struct Session {
    pub recipe: Recipe,
    pub config: Config,
    pub platform: PlatformContext,
}

impl Session {
    /// Load the recipe at `--source` and resolve the platform.
    ///
    /// Settings apply host detection first, then config files, then `-s`.
    pub fn load(args: &RecipeArgs) -> Result<Self> {
        let source = normalize_path(&args.source);
        if !is_cmake_project(&source) {
            bail!("no {} found in {}", BUILD_DESCRIPTION, source.display());
        }
        let config = load_config(global_config_path().as_deref(), &project_config_path(&source));

        let recipe = Recipe::load(&source)?;
        let platform = PlatformContext::host()
            .with_settings(config.setting_assignments())?
            .with_settings(&args.settings)?;
        tracing::debug!("platform: {}", platform);

        Ok(Session {
            recipe,
            config,
            platform,
        })
    }
}
