//! Core recipe types.

pub mod dependency;
pub mod errors;
pub mod options;
pub mod platform;
pub mod recipe;
pub mod version;

pub use dependency::{requirements, Requirement};
pub use errors::{Phase, RecipeError};
pub use options::{OptionName, OptionSet, OptionValue};
pub use platform::{Arch, BuildType, Compiler, Os, PlatformContext};
pub use recipe::{Recipe, RecipeMetadata, TOXCORE};
pub use version::VersionTriple;
