//! Build driver state machine.
//!
//! ```text
//!   Pending ──> Configured ──> Built ──┬──> Tested ──> Done
//!      │            │            │     └──────────────> Done   (tests off)
//!      ▼            ▼            ▼
//!    Failed       Failed       Failed
//! ```
//!
//! Every transition is one blocking external step. A failed step moves the
//! machine to `Failed` and the error is returned; nothing after it runs.
//! The only way to obtain a [`Completion`] is to reach `Done`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::cache_vars::BuildConfiguration;
use crate::builder::tool::{BuildTool, StepOutput};
use crate::core::errors::{Phase, RecipeError};

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing has run yet.
    Pending,
    Configured,
    Built,
    Tested,
    Done,
    /// Terminal; carries the phase whose step failed.
    Failed(Phase),
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Done | DriverState::Failed(_))
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Pending => f.write_str("pending"),
            DriverState::Configured => f.write_str("configured"),
            DriverState::Built => f.write_str("built"),
            DriverState::Tested => f.write_str("tested"),
            DriverState::Done => f.write_str("done"),
            DriverState::Failed(phase) => write!(f, "failed ({})", phase),
        }
    }
}

/// Proof that a build ran to `Done`.
///
/// Only the driver can construct one; packaging steps take it as a
/// precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    install_prefix: PathBuf,
    tested: bool,
}

impl Completion {
    pub fn install_prefix(&self) -> &Path {
        &self.install_prefix
    }

    /// Whether the test suite ran and passed.
    pub fn tested(&self) -> bool {
        self.tested
    }
}

/// Runs configure, build and optionally test against a [`BuildTool`].
pub struct BuildDriver<T: BuildTool> {
    tool: T,
    config: BuildConfiguration,
    run_tests: bool,
    state: DriverState,
    history: Vec<DriverState>,
    /// The error that moved the machine to `Failed`.
    failure: Option<RecipeError>,
}

impl<T: BuildTool> BuildDriver<T> {
    /// Create a driver in `Pending`. Nothing runs until [`step`](Self::step)
    /// or [`run`](Self::run).
    pub fn new(tool: T, config: BuildConfiguration, run_tests: bool) -> Self {
        BuildDriver {
            tool,
            config,
            run_tests,
            state: DriverState::Pending,
            history: vec![DriverState::Pending],
            failure: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Every state visited, in order.
    pub fn history(&self) -> &[DriverState] {
        &self.history
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Perform exactly one transition.
    ///
    /// Terminal states are left unchanged. On a failed step the state becomes
    /// `Failed` and the step's error is returned.
    pub fn step(&mut self) -> Result<DriverState, RecipeError> {
        let state = self.state;
        let next = match state {
            DriverState::Pending => {
                tracing::info!("configuring");
                let config = &self.config;
                let result = self.tool.configure(config);
                self.settle(Phase::Configure, result, DriverState::Configured)?
            }
            DriverState::Configured => {
                tracing::info!("building");
                let result = self.tool.build();
                self.settle(Phase::Build, result, DriverState::Built)?
            }
            DriverState::Built if self.run_tests => {
                tracing::info!("running tests");
                let result = self.tool.test();
                self.settle(Phase::Test, result, DriverState::Tested)?
            }
            DriverState::Built | DriverState::Tested => DriverState::Done,
            DriverState::Done | DriverState::Failed(_) => return Ok(state),
        };

        self.transition(next);
        Ok(next)
    }

    /// Step until a terminal state is reached.
    ///
    /// After a failure, every later call returns the original error again
    /// without running anything.
    pub fn run(&mut self) -> Result<Completion, RecipeError> {
        while !self.state.is_terminal() {
            self.step()?;
        }

        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(Completion {
                install_prefix: self.tool.install_prefix().to_path_buf(),
                tested: self.history.contains(&DriverState::Tested),
            }),
        }
    }

    fn settle(
        &mut self,
        phase: Phase,
        result: anyhow::Result<StepOutput>,
        on_success: DriverState,
    ) -> Result<DriverState, RecipeError> {
        match check_step(phase, result) {
            Ok(()) => Ok(on_success),
            Err(err) => {
                self.transition(DriverState::Failed(phase));
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: DriverState) {
        tracing::debug!("driver: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}

/// Install a completed build into the tool's prefix.
pub fn install<T: BuildTool>(tool: &T, completion: &Completion) -> Result<(), RecipeError> {
    tracing::info!("installing into {}", completion.install_prefix().display());
    check_step(Phase::Install, tool.install())
}

/// Turn a step result into success or a phase-tagged failure.
fn check_step(phase: Phase, result: anyhow::Result<StepOutput>) -> Result<(), RecipeError> {
    match result {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => {
            tracing::error!("{} step failed: `{}`", phase, output.command);
            Err(RecipeError::ExternalStepFailure {
                phase,
                output: output.combined(),
                command: output.command,
                code: output.code,
            })
        }
        Err(err) => Err(RecipeError::ExternalStepFailure {
            phase,
            command: String::new(),
            code: None,
            output: format!("{:#}", err),
        }),
    }
}
