//! Spinner output around external steps.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::cache_vars::BuildConfiguration;
use crate::builder::tool::{BuildTool, StepOutput};

/// Wraps a [`BuildTool`] and shows a spinner while each step runs.
pub struct ProgressTool<T: BuildTool> {
    inner: T,
    enabled: bool,
}

impl<T: BuildTool> ProgressTool<T> {
    /// Wrap `inner`. With `enabled = false` steps only print status lines.
    pub fn new(inner: T, enabled: bool) -> Self {
        ProgressTool { inner, enabled }
    }

    fn with_spinner<F>(&self, verb: &str, f: F) -> Result<StepOutput>
    where
        F: FnOnce(&T) -> Result<StepOutput>,
    {
        let start = Instant::now();

        let pb = if self.enabled {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
                pb.set_style(style);
            }
            pb.set_message(verb.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = f(&self.inner);

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let status = match &result {
            Ok(output) if output.success() => "Finished",
            _ => "Failed",
        };
        eprintln!(
            "{:>12} {} in {:.2}s",
            status,
            verb.to_lowercase(),
            start.elapsed().as_secs_f64()
        );

        result
    }
}

impl<T: BuildTool> BuildTool for ProgressTool<T> {
    fn configure(&self, config: &BuildConfiguration) -> Result<StepOutput> {
        self.with_spinner("Configuring", |tool| tool.configure(config))
    }

    fn build(&self) -> Result<StepOutput> {
        self.with_spinner("Building", |tool| tool.build())
    }

    fn test(&self) -> Result<StepOutput> {
        self.with_spinner("Testing", |tool| tool.test())
    }

    fn install(&self) -> Result<StepOutput> {
        self.with_spinner("Installing", |tool| tool.install())
    }

    fn install_prefix(&self) -> &Path {
        self.inner.install_prefix()
    }
}
