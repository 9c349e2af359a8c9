//! Recipe identity and loading.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::version::VersionTriple;

/// Static identity of the packaged project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecipeMetadata {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub license: &'static str,
}

/// Identity of c-toxcore.
pub static TOXCORE: RecipeMetadata = RecipeMetadata {
    name: "c-toxcore",
    url: "https://tox.chat",
    description: "The future of online communications.",
    license: "GPL-3.0-only",
};

/// A recipe bound to a source tree, with its version resolved.
#[derive(Debug, Clone)]
pub struct Recipe {
    metadata: &'static RecipeMetadata,
    version: VersionTriple,
    source_dir: PathBuf,
}

impl Recipe {
    /// Load the recipe for the source tree at `source_dir`.
    ///
    /// Fails if the version cannot be read from `CMakeLists.txt`.
    pub fn load(source_dir: &Path) -> Result<Self> {
        let version = VersionTriple::from_source_dir(source_dir)?;
        tracing::debug!("loaded recipe {} {}", TOXCORE.name, version);

        Ok(Recipe {
            metadata: &TOXCORE,
            version,
            source_dir: source_dir.to_path_buf(),
        })
    }

    pub fn metadata(&self) -> &'static RecipeMetadata {
        self.metadata
    }

    pub fn name(&self) -> &'static str {
        self.metadata.name
    }

    pub fn version(&self) -> &VersionTriple {
        &self.version
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// `name/version` reference string.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.metadata.name, self.version)
    }
}
