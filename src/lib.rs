//! ferry - A build recipe for c-toxcore
//!
//! This crate evaluates the c-toxcore recipe: it resolves the project
//! version from `CMakeLists.txt`, validates options against the target
//! platform, drives CMake through configure, build, test and install, and
//! exports package metadata for consumers.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for ferry unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted build tool and source tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::RecipeError, options::OptionSet, platform::PlatformContext, recipe::Recipe,
    version::VersionTriple,
};

pub use builder::{BuildConfiguration, BuildTool, CMakeTool};
pub use ops::{PackageInfo, PACKAGE_INFO_FILE};
