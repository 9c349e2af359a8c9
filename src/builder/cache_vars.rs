//! CMake cache variables derived from options and platform.
//!
//! [`generate`] is a pure function: it reads nothing but its arguments, and
//! the resulting map iterates in key order, so identical inputs always
//! render to identical configure arguments.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::core::options::OptionSet;
use crate::core::platform::{Compiler, PlatformContext};
use crate::util::fs::write_string;

/// Per-test timeout handed to the c-toxcore test suite.
pub const TEST_TIMEOUT_SECONDS: &str = "300";

/// Name of the initial-cache script written into the build directory.
pub const CACHE_SCRIPT: &str = "ferry_cache.cmake";

/// A single cache variable value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum CacheValue {
    Bool(bool),
    String(String),
}

impl CacheValue {
    /// CMake cache type for this value.
    pub fn cmake_type(&self) -> &'static str {
        match self {
            CacheValue::Bool(_) => "BOOL",
            CacheValue::String(_) => "STRING",
        }
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Bool(true) => f.write_str("ON"),
            CacheValue::Bool(false) => f.write_str("OFF"),
            CacheValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CacheValue {
    fn from(b: bool) -> Self {
        CacheValue::Bool(b)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::String(s.to_string())
    }
}

/// Cache variables handed to CMake at configure time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildConfiguration {
    vars: BTreeMap<String, CacheValue>,
}

impl BuildConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CacheValue>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CacheValue> {
        self.vars.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as `-DKEY:TYPE=value` configure arguments.
    pub fn to_define_args(&self) -> Vec<String> {
        self.iter()
            .map(|(key, value)| format!("-D{}:{}={}", key, value.cmake_type(), value))
            .collect()
    }

    /// Render as an initial-cache script for `cmake -C`.
    pub fn to_cache_script(&self) -> String {
        let mut script = String::from("# Generated by ferry. Do not edit.\n");
        for (key, value) in self.iter() {
            script.push_str(&format!(
                "set({} \"{}\" CACHE {} \"\" FORCE)\n",
                key,
                escape_cmake(&value.to_string()),
                value.cmake_type()
            ));
        }
        script
    }

    /// Write the initial-cache script into `build_dir`, returning its path.
    pub fn write_cache_script(&self, build_dir: &Path) -> Result<std::path::PathBuf> {
        let path = build_dir.join(CACHE_SCRIPT);
        write_string(&path, &self.to_cache_script())?;
        Ok(path)
    }
}

fn escape_cmake(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Derive the cache variables for `options` on `platform`.
pub fn generate(options: &OptionSet, platform: &PlatformContext) -> BuildConfiguration {
    let shared = options.shared();
    let with_tests = options.with_tests();

    let mut config = BuildConfiguration::new();
    config.set("AUTOTEST", with_tests);
    config.set("BUILD_MISC_TESTS", with_tests);
    config.set("TEST_TIMEOUT_SECONDS", TEST_TIMEOUT_SECONDS);

    // Emitted on every platform; CMake ignores it outside Windows.
    config.set("CMAKE_WINDOWS_EXPORT_ALL_SYMBOLS", shared);
    config.set("ENABLE_SHARED", shared);
    config.set("ENABLE_STATIC", !shared);
    config.set("MUST_BUILD_TOXAV", true);

    if platform.compiler == Compiler::Msvc {
        config.set("MSVC_STATIC_SODIUM", true);
        config.set("FLAT_OUTPUT_STRUCTURE", shared);
    }

    config
}
