//! Test utilities and mocks for ferry unit tests.
//!
//! [`MockBuildTool`] stands in for CMake so the driver and the create
//! operation can be exercised without a compiler toolchain.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferry::test_support::{MockBuildTool, MockStep};
//!
//! #[test]
//! fn test_example() {
//!     let tool = MockBuildTool::new().on_test(MockStep::fail(8, "1 test failed"));
//!     // Drive the tool...
//!     assert_eq!(tool.calls(), vec!["configure", "build", "test"]);
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::cache_vars::BuildConfiguration;
use crate::builder::tool::{BuildTool, StepOutput};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Scripted outcome of one mock step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStep {
    /// Exit 0 with the given stdout.
    Ok(String),
    /// Non-zero exit with the given output on stderr.
    Fail { code: i32, output: String },
    /// Killed by a signal: no exit code, output on stderr.
    Killed(String),
    /// The process could not be started at all.
    SpawnError(String),
}

impl MockStep {
    pub fn ok(stdout: impl Into<String>) -> Self {
        MockStep::Ok(stdout.into())
    }

    pub fn fail(code: i32, output: impl Into<String>) -> Self {
        MockStep::Fail {
            code,
            output: output.into(),
        }
    }

    fn run(&self, command: &str) -> Result<StepOutput> {
        match self {
            MockStep::Ok(stdout) => Ok(StepOutput {
                command: command.to_string(),
                code: Some(0),
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            MockStep::Fail { code, output } => Ok(StepOutput {
                command: command.to_string(),
                code: Some(*code),
                stdout: String::new(),
                stderr: output.clone(),
            }),
            MockStep::Killed(output) => Ok(StepOutput {
                command: command.to_string(),
                code: None,
                stdout: String::new(),
                stderr: output.clone(),
            }),
            MockStep::SpawnError(message) => bail!("{}", message),
        }
    }
}

impl Default for MockStep {
    fn default() -> Self {
        MockStep::ok("")
    }
}

/// Mock build tool that records calls and replays scripted outcomes.
///
/// A successful install creates every file registered with
/// [`MockBuildTool::installs`] under the install prefix.
#[derive(Debug)]
pub struct MockBuildTool {
    configure: MockStep,
    build: MockStep,
    test: MockStep,
    install: MockStep,
    prefix: PathBuf,
    installed_files: Vec<PathBuf>,
    calls: RefCell<Vec<&'static str>>,
    configured_with: RefCell<Option<BuildConfiguration>>,
}

impl MockBuildTool {
    /// Create a tool on which every step succeeds.
    pub fn new() -> Self {
        MockBuildTool {
            configure: MockStep::default(),
            build: MockStep::default(),
            test: MockStep::default(),
            install: MockStep::default(),
            prefix: PathBuf::from("/nonexistent/ferry-mock/package"),
            installed_files: Vec::new(),
            calls: RefCell::new(Vec::new()),
            configured_with: RefCell::new(None),
        }
    }

    pub fn on_configure(mut self, step: MockStep) -> Self {
        self.configure = step;
        self
    }

    pub fn on_build(mut self, step: MockStep) -> Self {
        self.build = step;
        self
    }

    pub fn on_test(mut self, step: MockStep) -> Self {
        self.test = step;
        self
    }

    pub fn on_install(mut self, step: MockStep) -> Self {
        self.install = step;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Files, relative to the prefix, that a successful install produces.
    pub fn installs<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        self.installed_files
            .extend(files.into_iter().map(|f| f.as_ref().to_path_buf()));
        self
    }

    /// Steps invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Configuration passed to the last configure call.
    pub fn configured_with(&self) -> Option<BuildConfiguration> {
        self.configured_with.borrow().clone()
    }

    fn record(&self, step: &'static str) {
        self.calls.borrow_mut().push(step);
    }
}

impl Default for MockBuildTool {
    fn default() -> Self {
        MockBuildTool::new()
    }
}

impl BuildTool for MockBuildTool {
    fn configure(&self, config: &BuildConfiguration) -> Result<StepOutput> {
        self.record("configure");
        *self.configured_with.borrow_mut() = Some(config.clone());
        self.configure.run("cmake -S src -B build")
    }

    fn build(&self) -> Result<StepOutput> {
        self.record("build");
        self.build.run("cmake --build build")
    }

    fn test(&self) -> Result<StepOutput> {
        self.record("test");
        self.test.run("ctest --test-dir build --output-on-failure")
    }

    fn install(&self) -> Result<StepOutput> {
        self.record("install");
        let output = self.install.run("cmake --install build")?;
        if output.success() {
            for file in &self.installed_files {
                let path = self.prefix.join(file);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, b"")?;
            }
        }
        Ok(output)
    }

    fn install_prefix(&self) -> &Path {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_records_calls() {
        let tool = MockBuildTool::new();
        tool.configure(&BuildConfiguration::new()).unwrap();
        tool.build().unwrap();

        assert_eq!(tool.calls(), vec!["configure", "build"]);
        assert_eq!(tool.configured_with(), Some(BuildConfiguration::new()));
    }

    #[test]
    fn test_mock_failure_output() {
        let tool = MockBuildTool::new().on_build(MockStep::fail(2, "undefined reference"));
        let output = tool.build().unwrap();

        assert_eq!(output.code, Some(2));
        assert_eq!(output.combined(), "undefined reference");
    }

    #[test]
    fn test_mock_spawn_error() {
        let tool = MockBuildTool::new().on_test(MockStep::SpawnError("ctest not found".into()));
        let err = tool.test().unwrap_err();
        assert!(err.to_string().contains("ctest not found"));
    }

    #[test]
    fn test_mock_killed_step_has_no_code() {
        let tool = MockBuildTool::new().on_build(MockStep::Killed("Terminated".into()));
        let output = tool.build().unwrap();

        assert_eq!(output.code, None);
        assert!(!output.success());
    }

    #[test]
    fn test_mock_install_creates_files() {
        let tmp = TempDir::new().unwrap();
        let tool = MockBuildTool::new()
            .with_prefix(tmp.path())
            .installs(["lib/libtoxcore.a"]);

        tool.install().unwrap();
        assert!(tmp.path().join("lib/libtoxcore.a").is_file());
    }

    #[test]
    fn test_mock_failed_install_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let tool = MockBuildTool::new()
            .with_prefix(tmp.path())
            .installs(["lib/libtoxcore.a"])
            .on_install(MockStep::fail(1, ""));

        assert!(!tool.install().unwrap().success());
        assert!(!tmp.path().join("lib").exists());
    }
}
