//! Platform context the recipe is evaluated against.
//!
//! Every component that depends on the target platform receives a
//! [`PlatformContext`] value. Host detection lives here and is the only
//! place that looks at the environment.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::core::errors::RecipeError;
use crate::core::options::split_assignment;
use crate::util::process::find_executable;

/// Generate `as_str`, `Display`, `Serialize`, `FromStr` (case-insensitive) and `ALL`
/// for a closed setting enum.
macro_rules! setting_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RecipeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                $(
                    if lower == $canonical.to_ascii_lowercase() $(|| lower == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(RecipeError::InvalidOptionValue {
                    kind: "setting",
                    name: $kind.to_string(),
                    value: s.to_string(),
                    allowed: Self::ALL.iter().map(|v| v.as_str().to_string()).collect(),
                })
            }
        }
    };
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    WindowsStore,
    Linux,
    Macos,
    FreeBsd,
    Android,
    Ios,
}

setting_enum!(Os, "os", {
    Windows => "Windows",
    WindowsStore => "WindowsStore",
    Linux => "Linux",
    Macos => "Macos" | "darwin" | "macosx",
    FreeBsd => "FreeBSD",
    Android => "Android",
    Ios => "iOS",
});

impl Os {
    /// Whether this OS belongs to the Windows family.
    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows | Os::WindowsStore)
    }

    /// The OS this binary was compiled for.
    pub fn host() -> Os {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBsd,
            "android" => Os::Android,
            "ios" => Os::Ios,
            _ => Os::Linux,
        }
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

setting_enum!(Compiler, "compiler", {
    Gcc => "gcc",
    Clang => "clang",
    AppleClang => "apple-clang",
    Msvc => "msvc" | "cl" | "visual studio",
});

impl Compiler {
    /// Detect the host compiler family.
    ///
    /// Honors `CC` first, then probes PATH the way CMake would pick a default.
    pub fn detect(os: Os) -> Compiler {
        if let Ok(cc) = std::env::var("CC") {
            if let Some(compiler) = Self::from_program_name(&cc, os) {
                return compiler;
            }
        }

        if os.is_windows() && find_executable("cl").is_some() {
            return Compiler::Msvc;
        }
        if os == Os::Macos {
            return Compiler::AppleClang;
        }
        if find_executable("gcc").is_none() && find_executable("clang").is_some() {
            return Compiler::Clang;
        }

        match os {
            Os::Windows | Os::WindowsStore => Compiler::Msvc,
            Os::FreeBsd | Os::Android | Os::Ios => Compiler::Clang,
            _ => Compiler::Gcc,
        }
    }

    fn from_program_name(program: &str, os: Os) -> Option<Compiler> {
        let name = std::path::Path::new(program)
            .file_stem()?
            .to_string_lossy()
            .to_ascii_lowercase();

        if name == "cl" || name == "clang-cl" {
            Some(Compiler::Msvc)
        } else if name.contains("clang") {
            Some(if os == Os::Macos {
                Compiler::AppleClang
            } else {
                Compiler::Clang
            })
        } else if name.contains("gcc") || name == "cc" {
            Some(Compiler::Gcc)
        } else {
            None
        }
    }
}

/// Target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

setting_enum!(Arch, "arch", {
    X86 => "x86" | "i686",
    X86_64 => "x86_64" | "amd64",
    Armv7 => "armv7" | "arm",
    Armv8 => "armv8" | "aarch64" | "arm64",
});

impl Arch {
    pub fn host() -> Arch {
        match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "arm" => Arch::Armv7,
            "aarch64" => Arch::Armv8,
            _ => Arch::X86_64,
        }
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

setting_enum!(BuildType, "build_type", {
    Debug => "Debug",
    Release => "Release",
    RelWithDebInfo => "RelWithDebInfo",
    MinSizeRel => "MinSizeRel",
});

/// The platform a recipe evaluation targets.
///
/// Supplied from outside and never mutated by the recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformContext {
    pub os: Os,
    pub compiler: Compiler,
    pub arch: Arch,
    pub build_type: BuildType,
}

impl PlatformContext {
    pub fn new(os: Os, compiler: Compiler, arch: Arch, build_type: BuildType) -> Self {
        PlatformContext {
            os,
            compiler,
            arch,
            build_type,
        }
    }

    /// Detect the host platform. Build type defaults to `Release`.
    pub fn host() -> Self {
        let os = Os::host();
        let context = PlatformContext::new(os, Compiler::detect(os), Arch::host(), BuildType::Release);
        tracing::debug!("detected host platform: {}", context);
        context
    }

    /// Return a copy with `key=value` settings applied in order.
    pub fn with_settings<I, S>(mut self, settings: I) -> Result<Self, RecipeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for setting in settings {
            let (key, value) = split_assignment("setting", setting.as_ref())?;
            self.apply_setting(key, value)?;
        }
        Ok(self)
    }

    /// Apply one setting override.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), RecipeError> {
        match key {
            "os" => self.os = value.parse()?,
            "compiler" => self.compiler = value.parse()?,
            "arch" => self.arch = value.parse()?,
            "build_type" => self.build_type = value.parse()?,
            other => {
                return Err(RecipeError::UnknownOption {
                    kind: "setting",
                    name: other.to_string(),
                    known: vec!["os", "compiler", "arch", "build_type"],
                })
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlatformContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} compiler={} arch={} build_type={}",
            self.os, self.compiler, self.arch, self.build_type
        )
    }
}
