//! High-level operations.
//!
//! This module contains the implementation of ferry commands.

pub mod export;
pub mod ferry_create;

pub use export::{collect_libs, system_libs, PackageExporter, PackageInfo, PACKAGE_INFO_FILE};
pub use ferry_create::{create, evaluate, resolve_options, CreateResult, Evaluation};
