//! Build configuration and external build tool driving.
//!
//! This module turns options and platform into CMake cache variables and
//! runs the configure/build/test pipeline through a [`BuildTool`].

pub mod cache_vars;
pub mod cmake;
pub mod driver;
pub mod progress;
pub mod tool;

pub use cache_vars::{generate, BuildConfiguration, CacheValue};
pub use cmake::CMakeTool;
pub use driver::{install, BuildDriver, Completion, DriverState};
pub use progress::ProgressTool;
pub use tool::{BuildTool, StepOutput};
