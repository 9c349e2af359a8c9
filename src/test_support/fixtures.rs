//! Test fixtures for common test scenarios.
//!
//! Source trees are written to a temporary directory that is removed when
//! the returned [`TempDir`] is dropped.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A `CMakeLists.txt` shaped like c-toxcore's, declaring the given version.
pub fn cmake_lists(major: &str, minor: &str, patch: &str) -> String {
    format!(
        r#"cmake_minimum_required(VERSION 3.16)
cmake_policy(VERSION 3.16)
project(toxcore)

list(APPEND CMAKE_MODULE_PATH ${{toxcore_SOURCE_DIR}}/cmake)

set_source_files_properties(
  toxcore/mono_time.c
  toxcore/network.c
  PROPERTIES SKIP_UNITY_BUILD_INCLUSION TRUE)

################################################################################
#
# :: Version management
#
################################################################################

# This version is for the entire project. All libraries (core, av, ...) move in
# versions in a synchronised way.
set(PROJECT_VERSION_MAJOR "{major}")
set(PROJECT_VERSION_MINOR "{minor}")
set(PROJECT_VERSION_PATCH "{patch}")
set(PROJECT_VERSION "${{PROJECT_VERSION_MAJOR}}.${{PROJECT_VERSION_MINOR}}.${{PROJECT_VERSION_PATCH}}")

option(ENABLE_SHARED "Build shared (dynamic) libraries for all modules" ON)
option(ENABLE_STATIC "Build static libraries for all modules" ON)
option(AUTOTEST "Enable autotests (mainly for CI)" OFF)
"#
    )
}

/// Fixture for a source checkout.
#[derive(Debug, Clone)]
pub struct SourceTreeFixture {
    /// CMakeLists.txt content.
    pub cmake_lists: String,
    /// Extra files (path relative to the root -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl SourceTreeFixture {
    /// A tree whose CMakeLists.txt has exactly `cmake_lists`.
    pub fn new(cmake_lists: impl Into<String>) -> Self {
        SourceTreeFixture {
            cmake_lists: cmake_lists.into(),
            files: Vec::new(),
        }
    }

    /// A c-toxcore checkout at the given version.
    pub fn toxcore(major: &str, minor: &str, patch: &str) -> Self {
        SourceTreeFixture::new(cmake_lists(major, minor, patch))
            .with_file("toxcore/tox.h", "#ifndef C_TOXCORE_TOXCORE_TOX_H\n#endif\n")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write the tree to a fresh temporary directory.
    pub fn create(&self) -> TempDir {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("CMakeLists.txt"), &self.cmake_lists)
            .expect("failed to write CMakeLists.txt");

        for (path, content) in &self.files {
            let path = dir.path().join(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create fixture dir");
            }
            fs::write(&path, content).expect("failed to write fixture file");
        }

        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmake_lists_declares_version_lines() {
        let content = cmake_lists("0", "2", "20");
        assert!(content.contains("\nset(PROJECT_VERSION_MAJOR \"0\")\n"));
        assert!(content.contains("\nset(PROJECT_VERSION_MINOR \"2\")\n"));
        assert!(content.contains("\nset(PROJECT_VERSION_PATCH \"20\")\n"));
    }

    #[test]
    fn test_source_tree_fixture_create() {
        let tree = SourceTreeFixture::toxcore("0", "2", "20").create();

        assert!(tree.path().join("CMakeLists.txt").is_file());
        assert!(tree.path().join("toxcore/tox.h").is_file());
    }
}
