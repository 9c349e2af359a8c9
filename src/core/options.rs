//! Recipe options.
//!
//! The recipe recognizes two independent boolean options. Overrides arrive
//! as raw strings (from the command line or a config file) and are checked
//! against the option's domain before they are stored, so an `OptionSet`
//! never holds a value outside its declared domain.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::errors::RecipeError;

/// A recognized recipe option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionName {
    /// Build shared instead of static libraries.
    Shared,
    /// Build and run the test suite.
    WithTests,
}

impl OptionName {
    pub const ALL: [OptionName; 2] = [OptionName::Shared, OptionName::WithTests];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Shared => "shared",
            OptionName::WithTests => "with_tests",
        }
    }

    /// Static declaration of this option's domain and default.
    pub fn decl(&self) -> &'static OptionDecl {
        match self {
            OptionName::Shared => &SHARED,
            OptionName::WithTests => &WITH_TESTS,
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|o| o.as_str()).collect()
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "shared" => Ok(OptionName::Shared),
            "with_tests" => Ok(OptionName::WithTests),
            other => Err(RecipeError::UnknownOption {
                kind: "option",
                name: other.to_string(),
                known: Self::names(),
            }),
        }
    }
}

/// Declared domain and default of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionDecl {
    pub name: &'static str,
    pub allowed: &'static [bool],
    pub default: bool,
}

static SHARED: OptionDecl = OptionDecl {
    name: "shared",
    allowed: &[true, false],
    default: false,
};

static WITH_TESTS: OptionDecl = OptionDecl {
    name: "with_tests",
    allowed: &[true, false],
    default: false,
};

/// A value that has been checked against an option's domain.
///
/// The only way to build one is [`OptionValue::parse`] or
/// [`OptionValue::new`], both of which reject out-of-domain input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionValue(bool);

impl OptionValue {
    /// Parse a raw override for `option`.
    ///
    /// Accepts `True`/`False` in any case, and `1`/`0`.
    pub fn parse(option: OptionName, raw: &str) -> Result<Self, RecipeError> {
        let value = match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(invalid_value(option, raw)),
        };
        Self::new(option, value).map_err(|_| invalid_value(option, raw))
    }

    /// Check a typed value against the option's domain.
    pub fn new(option: OptionName, value: bool) -> Result<Self, RecipeError> {
        if option.decl().allowed.contains(&value) {
            Ok(OptionValue(value))
        } else {
            Err(invalid_value(option, &render_bool(value)))
        }
    }

    pub fn get(&self) -> bool {
        self.0
    }
}

fn invalid_value(option: OptionName, raw: &str) -> RecipeError {
    RecipeError::InvalidOptionValue {
        kind: "option",
        name: option.as_str().to_string(),
        value: raw.to_string(),
        allowed: option
            .decl()
            .allowed
            .iter()
            .map(|v| render_bool(*v))
            .collect(),
    }
}

fn render_bool(value: bool) -> String {
    let name = if value { "True" } else { "False" };
    name.to_string()
}

/// Current values of every recipe option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OptionSet {
    shared: bool,
    with_tests: bool,
}

impl Default for OptionSet {
    fn default() -> Self {
        OptionSet {
            shared: SHARED.default,
            with_tests: WITH_TESTS.default,
        }
    }
}

impl OptionSet {
    /// Build an option set from `name=value` assignments, applied in order.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, RecipeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = OptionSet::default();
        for assignment in assignments {
            options.apply_assignment(assignment.as_ref())?;
        }
        Ok(options)
    }

    /// Apply a single `name=value` assignment.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), RecipeError> {
        let (name, value) = split_assignment("option", assignment)?;
        self.apply(name, value)
    }

    /// Apply a raw override. Later overrides replace earlier ones.
    pub fn apply(&mut self, name: &str, raw: &str) -> Result<(), RecipeError> {
        let option: OptionName = name.parse()?;
        let value = OptionValue::parse(option, raw)?;
        self.set(option, value);
        Ok(())
    }

    pub fn set(&mut self, option: OptionName, value: OptionValue) {
        match option {
            OptionName::Shared => self.shared = value.get(),
            OptionName::WithTests => self.with_tests = value.get(),
        }
    }

    pub fn get(&self, option: OptionName) -> bool {
        match option {
            OptionName::Shared => self.shared,
            OptionName::WithTests => self.with_tests,
        }
    }

    pub fn shared(&self) -> bool {
        self.shared
    }

    pub fn with_tests(&self) -> bool {
        self.with_tests
    }

    /// Iterate options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, bool)> + '_ {
        OptionName::ALL.into_iter().map(move |o| (o, self.get(o)))
    }
}

/// Split `key=value`, rejecting assignments without `=`.
pub(crate) fn split_assignment<'a>(
    kind: &'static str,
    assignment: &'a str,
) -> Result<(&'a str, &'a str), RecipeError> {
    match assignment.split_once('=') {
        Some((key, value)) => Ok((key.trim(), value.trim())),
        None => Err(RecipeError::InvalidOptionValue {
            kind,
            name: assignment.trim().to_string(),
            value: String::new(),
            allowed: vec!["<name>=<value>".to_string()],
        }),
    }
}
