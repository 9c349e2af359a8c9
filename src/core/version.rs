//! Version extraction from the CMake build description.
//!
//! c-toxcore keeps its version in `CMakeLists.txt` as three separate
//! `set(PROJECT_VERSION_<FIELD> "<value>")` lines. The recipe version is
//! stamped from those lines once, when the recipe is loaded.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::errors::RecipeError;
use crate::util::fs::read_to_string;

/// Name of the build description file in the source root.
pub const BUILD_DESCRIPTION: &str = "CMakeLists.txt";

static MAJOR: LazyLock<Regex> = LazyLock::new(|| field_regex("MAJOR"));
static MINOR: LazyLock<Regex> = LazyLock::new(|| field_regex("MINOR"));
static PATCH: LazyLock<Regex> = LazyLock::new(|| field_regex("PATCH"));

fn field_regex(field: &str) -> Regex {
    Regex::new(&format!(r#"set\(PROJECT_VERSION_{} "([^"\n]*)"\)"#, field))
        .expect("valid version pattern")
}

/// A `major.minor.patch` version read from the build description.
///
/// Each part is kept as the trimmed text from the file, so the rendered
/// version is exactly what the project declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTriple {
    pub major: String,
    pub minor: String,
    pub patch: String,
}

impl VersionTriple {
    /// Extract the version from the text of a build description.
    pub fn resolve(content: &str) -> Result<Self, RecipeError> {
        Ok(VersionTriple {
            major: extract_field(content, "MAJOR", &MAJOR)?,
            minor: extract_field(content, "MINOR", &MINOR)?,
            patch: extract_field(content, "PATCH", &PATCH)?,
        })
    }

    /// Read `CMakeLists.txt` from `source_dir` and extract the version.
    pub fn from_source_dir(source_dir: &Path) -> Result<Self> {
        let path = source_dir.join(BUILD_DESCRIPTION);
        let content = read_to_string(&path)?;
        let version = Self::resolve(&content)?;
        tracing::debug!("resolved version {} from {}", version, path.display());
        Ok(version)
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn extract_field(content: &str, field: &'static str, re: &Regex) -> Result<String, RecipeError> {
    let mut matches = re.captures_iter(content);

    let value = matches
        .next()
        .map(|caps| caps[1].trim().to_string())
        .ok_or(RecipeError::VersionNotFound { field })?;

    if matches.next().is_some() {
        tracing::warn!(
            "PROJECT_VERSION_{} is set more than once; using the first value `{}`",
            field,
            value
        );
    }

    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(RecipeError::InvalidVersionField { field, value });
    }

    Ok(value)
}
