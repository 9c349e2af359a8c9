//! CMake/CTest implementation of [`BuildTool`].

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::builder::cache_vars::BuildConfiguration;
use crate::builder::tool::{BuildTool, StepOutput};
use crate::core::platform::PlatformContext;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, find_ctest, ProcessBuilder};

/// Drives a CMake project through configure, build, test and install.
#[derive(Debug, Clone)]
pub struct CMakeTool {
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_prefix: PathBuf,
    platform: PlatformContext,
    generator: Option<String>,
    jobs: Option<usize>,
    verbose: bool,
}

impl CMakeTool {
    /// Create a tool for `source_dir`, building in `build_dir`.
    ///
    /// The install prefix defaults to `<build_dir>/package`.
    pub fn new(source_dir: PathBuf, build_dir: PathBuf, platform: PlatformContext) -> Self {
        let install_prefix = build_dir.join("package");
        CMakeTool {
            source_dir,
            build_dir,
            install_prefix,
            platform,
            generator: None,
            jobs: None,
            verbose: false,
        }
    }

    /// Set the install prefix.
    pub fn with_install_prefix(mut self, prefix: PathBuf) -> Self {
        self.install_prefix = prefix;
        self
    }

    /// Use a specific CMake generator.
    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    /// Set build and test parallelism.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Ask CMake for verbose build output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn cmake(&self) -> Result<ProcessBuilder> {
        let cmake = find_cmake().ok_or_else(|| {
            anyhow!(
                "CMake not found\n\
                 \n\
                 CMake is required to build c-toxcore.\n\
                 Install CMake and ensure it's in your PATH, or set CMAKE."
            )
        })?;
        Ok(ProcessBuilder::new(cmake))
    }

    fn ctest(&self) -> Result<ProcessBuilder> {
        let ctest = find_ctest()
            .ok_or_else(|| anyhow!("CTest not found; it ships with CMake, check your PATH"))?;
        Ok(ProcessBuilder::new(ctest))
    }

    fn build_type(&self) -> &'static str {
        self.platform.build_type.as_str()
    }

    /// Arguments for the configure step, excluding the program.
    pub fn configure_args(&self, cache_script: &Path) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];

        if let Some(ref generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }

        args.push("-C".to_string());
        args.push(cache_script.display().to_string());
        args.push(format!("-DCMAKE_BUILD_TYPE={}", self.build_type()));
        args.push(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            self.install_prefix.display()
        ));

        args
    }

    /// Arguments for the build step, excluding the program.
    pub fn build_args(&self) -> Vec<String> {
        // --config is ignored by single-config generators
        let mut args = vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type().to_string(),
        ];

        match self.jobs {
            Some(jobs) => {
                args.push("--parallel".to_string());
                args.push(jobs.to_string());
            }
            None => args.push("--parallel".to_string()),
        }

        if self.verbose {
            args.push("--verbose".to_string());
        }

        args
    }

    /// Arguments for the test step, excluding the program.
    pub fn test_args(&self) -> Vec<String> {
        let mut args = vec![
            "--test-dir".to_string(),
            self.build_dir.display().to_string(),
            "-C".to_string(),
            self.build_type().to_string(),
            "--output-on-failure".to_string(),
        ];

        if let Some(jobs) = self.jobs {
            args.push("-j".to_string());
            args.push(jobs.to_string());
        }

        args
    }

    /// Arguments for the install step, excluding the program.
    pub fn install_args(&self) -> Vec<String> {
        vec![
            "--install".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type().to_string(),
            "--prefix".to_string(),
            self.install_prefix.display().to_string(),
        ]
    }

    fn run(&self, cmd: ProcessBuilder) -> Result<StepOutput> {
        let command = cmd.display_command();
        let output = cmd.cwd(&self.build_dir).exec()?;
        let step = StepOutput::from_output(command, &output);

        if self.verbose {
            for line in step.stdout.lines() {
                tracing::debug!("{}", line);
            }
        }

        Ok(step)
    }
}

impl BuildTool for CMakeTool {
    fn configure(&self, config: &BuildConfiguration) -> Result<StepOutput> {
        ensure_dir(&self.build_dir)?;
        let script = config.write_cache_script(&self.build_dir)?;

        tracing::debug!("cache variables: {}", config.to_define_args().join(" "));

        let cmd = self.cmake()?.args(self.configure_args(&script));
        self.run(cmd)
    }

    fn build(&self) -> Result<StepOutput> {
        let cmd = self.cmake()?.args(self.build_args());
        self.run(cmd)
    }

    fn test(&self) -> Result<StepOutput> {
        let cmd = self.ctest()?.args(self.test_args());
        self.run(cmd)
    }

    fn install(&self) -> Result<StepOutput> {
        ensure_dir(&self.install_prefix)?;
        let cmd = self.cmake()?.args(self.install_args());
        self.run(cmd)
    }

    fn install_prefix(&self) -> &Path {
        &self.install_prefix
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}
