//! Recipe error taxonomy and diagnostics.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// The recipe phase an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Reading the version out of `CMakeLists.txt`.
    Version,
    /// Validating option and setting overrides.
    Options,
    /// `cmake -S ... -B ...`
    Configure,
    /// `cmake --build`
    Build,
    /// `ctest`
    Test,
    /// `cmake --install`
    Install,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Version => "version resolution",
            Phase::Options => "option validation",
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Test => "test",
            Phase::Install => "install",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal error raised while evaluating the recipe.
///
/// None of these are recovered from locally; they abort the whole evaluation
/// and no package metadata is produced.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum RecipeError {
    #[error("`set(PROJECT_VERSION_{field} \"...\")` not found in build description")]
    #[diagnostic(
        code(ferry::version::not_found),
        help("CMakeLists.txt must set PROJECT_VERSION_MAJOR, _MINOR and _PATCH")
    )]
    VersionNotFound { field: &'static str },

    #[error("PROJECT_VERSION_{field} has non-numeric value `{value}`")]
    #[diagnostic(code(ferry::version::invalid_field))]
    InvalidVersionField { field: &'static str, value: String },

    #[error("unknown {kind} `{name}`")]
    #[diagnostic(code(ferry::options::unknown))]
    UnknownOption {
        kind: &'static str,
        name: String,
        known: Vec<&'static str>,
    },

    #[error("invalid value `{value}` for {kind} `{name}`")]
    #[diagnostic(code(ferry::options::invalid_value))]
    InvalidOptionValue {
        kind: &'static str,
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{phase} step failed{}", exit_suffix(.code))]
    #[diagnostic(code(ferry::step::failed))]
    ExternalStepFailure {
        phase: Phase,
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

impl RecipeError {
    /// The phase this error aborted.
    pub fn phase(&self) -> Phase {
        match self {
            RecipeError::VersionNotFound { .. } | RecipeError::InvalidVersionField { .. } => {
                Phase::Version
            }
            RecipeError::UnknownOption { .. } | RecipeError::InvalidOptionValue { .. } => {
                Phase::Options
            }
            RecipeError::ExternalStepFailure { phase, .. } => *phase,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string())
            .with_context(format!("phase: {}", self.phase()));

        match self {
            RecipeError::VersionNotFound { field } => diag.with_suggestion(format!(
                "Add `set(PROJECT_VERSION_{} \"<number>\")` to CMakeLists.txt",
                field
            )),

            RecipeError::InvalidVersionField { .. } => {
                diag.with_suggestion("Version fields must be plain decimal numbers")
            }

            RecipeError::UnknownOption { kind, known, .. } => diag.with_suggestion(format!(
                "Known {}s: {}",
                kind,
                known.join(", ")
            )),

            RecipeError::InvalidOptionValue { allowed, .. } => {
                diag.with_suggestion(format!("Use one of: {}", allowed.join(", ")))
            }

            RecipeError::ExternalStepFailure {
                phase,
                command,
                output,
                ..
            } => {
                let mut diag = diag.with_context(format!("command: {}", command));
                let output = output.trim();
                if !output.is_empty() {
                    diag = diag.with_context(format!("output:\n{}", output));
                }
                if *phase == Phase::Test {
                    diag.with_suggestion("Rerun without `-o with_tests=True` to skip the test suite")
                } else {
                    diag.with_suggestion(suggestions::BUILD_FAILED)
                }
            }
        }
    }
}
