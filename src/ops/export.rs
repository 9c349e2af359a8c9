//! Package metadata export.
//!
//! Runs after a successful build and install. Scans the install prefix for
//! the libraries the build produced and describes them, together with the
//! platform's system libraries, for downstream consumers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::builder::driver::Completion;
use crate::core::dependency::requirements;
use crate::core::options::OptionSet;
use crate::core::platform::{Compiler, Os, PlatformContext};
use crate::core::recipe::Recipe;
use crate::util::fs::write_string;
use crate::util::git::source_revision;

/// File name of the exported metadata inside the install prefix.
pub const PACKAGE_INFO_FILE: &str = "ferry-package.json";

/// Library directories scanned under the install prefix.
const LIB_DIRS: [&str; 2] = ["lib", "lib64"];

/// Windows libraries c-toxcore links against.
const WINDOWS_SYSTEM_LIBS: [&str; 2] = ["Ws2_32", "Iphlpapi"];

/// Consumer-facing description of the built package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    /// Library names produced by the build, without prefix or extension.
    pub libraries: BTreeSet<String>,
    /// Platform libraries consumers must link as well.
    pub system_libraries: Vec<String>,
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    pub settings: PlatformContext,
    pub options: OptionSet,
}

impl PackageInfo {
    /// Linker arguments a consumer needs, in link order.
    pub fn link_args(&self, compiler: Compiler) -> Vec<String> {
        self.libraries
            .iter()
            .chain(self.system_libraries.iter())
            .map(|lib| {
                if compiler == Compiler::Msvc {
                    format!("{}.lib", lib)
                } else {
                    format!("-l{}", lib)
                }
            })
            .collect()
    }

    /// Write as pretty JSON into `prefix`, returning the file path.
    pub fn write(&self, prefix: &Path) -> Result<PathBuf> {
        let path = prefix.join(PACKAGE_INFO_FILE);
        let json = serde_json::to_string_pretty(self).context("failed to serialize package info")?;
        write_string(&path, &json)?;
        Ok(path)
    }
}

/// System libraries for `os`.
pub fn system_libs(os: Os) -> Vec<String> {
    if os.is_windows() {
        WINDOWS_SYSTEM_LIBS.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    }
}

/// Collect library names from the library directories under `prefix`.
///
/// Only `.a`, `.so`, `.dylib` and `.lib` files count; versioned sonames such
/// as `libtoxcore.so.2` are links to a library already seen. Static and
/// shared flavours of one library collapse into a single name.
pub fn collect_libs(prefix: &Path) -> Result<BTreeSet<String>> {
    let mut libs = BTreeSet::new();

    for dir in LIB_DIRS.iter().map(|d| prefix.join(d)).filter(|d| d.is_dir()) {
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            if let Some(name) = library_name(entry.path()) {
                libs.insert(name);
            }
        }
    }

    Ok(libs)
}

fn library_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    let stem = path.file_stem()?.to_str()?;

    let name = match ext {
        "lib" => stem,
        "a" | "so" | "dylib" => stem.strip_prefix("lib").unwrap_or(stem),
        _ => return None,
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Assembles [`PackageInfo`] for one recipe evaluation.
pub struct PackageExporter<'a> {
    recipe: &'a Recipe,
    platform: &'a PlatformContext,
    options: &'a OptionSet,
}

impl<'a> PackageExporter<'a> {
    pub fn new(recipe: &'a Recipe, platform: &'a PlatformContext, options: &'a OptionSet) -> Self {
        PackageExporter {
            recipe,
            platform,
            options,
        }
    }

    /// Describe the installed package. Requires a completed build.
    pub fn export(&self, completion: &Completion) -> Result<PackageInfo> {
        let prefix = completion.install_prefix();
        let libraries = collect_libs(prefix)?;

        if libraries.is_empty() {
            tracing::warn!("no libraries found under {}", prefix.display());
        }

        Ok(PackageInfo {
            name: self.recipe.name().to_string(),
            version: self.recipe.version().to_string(),
            libraries,
            system_libraries: system_libs(self.platform.os),
            requires: requirements(self.platform)
                .iter()
                .map(|r| r.to_string())
                .collect(),
            revision: source_revision(self.recipe.source_dir()),
            settings: *self.platform,
            options: *self.options,
        })
    }
}
