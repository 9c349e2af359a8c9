//! The external build tool seam.
//!
//! [`BuildTool`] is the narrow interface the driver uses to run configure,
//! build, test and install. Each call blocks until the external process
//! exits and reports its status and captured output.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::builder::cache_vars::BuildConfiguration;

/// Captured result of one external step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    /// Command line that was run, for diagnostics.
    pub command: String,
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    pub fn from_output(command: impl Into<String>, output: &Output) -> Self {
        StepOutput {
            command: command.into(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// An external configure/build/test/install pipeline.
pub trait BuildTool {
    /// Configure the build tree with the given cache variables.
    fn configure(&self, config: &BuildConfiguration) -> Result<StepOutput>;

    /// Compile the configured tree.
    fn build(&self) -> Result<StepOutput>;

    /// Run the test suite. Output is expected to include per-test diagnostics
    /// for failing tests.
    fn test(&self) -> Result<StepOutput>;

    /// Install the built tree into the install prefix.
    fn install(&self) -> Result<StepOutput>;

    /// Directory `install` writes to.
    fn install_prefix(&self) -> &Path;
}

impl<T: BuildTool + ?Sized> BuildTool for &T {
    fn configure(&self, config: &BuildConfiguration) -> Result<StepOutput> {
        (**self).configure(config)
    }

    fn build(&self) -> Result<StepOutput> {
        (**self).build()
    }

    fn test(&self) -> Result<StepOutput> {
        (**self).test()
    }

    fn install(&self) -> Result<StepOutput> {
        (**self).install()
    }

    fn install_prefix(&self) -> &Path {
        (**self).install_prefix()
    }
}
