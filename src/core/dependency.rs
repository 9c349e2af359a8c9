//! Declared package requirements.

use std::fmt;

use semver::Version;
use serde::Serialize;

use crate::core::platform::PlatformContext;

/// A pinned requirement on another package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Requirement {
    pub name: &'static str,
    pub version: Version,
}

impl Requirement {
    pub const fn new(name: &'static str, major: u64, minor: u64, patch: u64) -> Self {
        Requirement {
            name,
            version: Version::new(major, minor, patch),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Cryptography primitives.
pub const LIBSODIUM: Requirement = Requirement::new("libsodium", 1, 0, 18);
/// Audio codec used by toxav.
pub const OPUS: Requirement = Requirement::new("opus", 1, 3, 1);
/// Video codec used by toxav.
pub const LIBVPX: Requirement = Requirement::new("libvpx", 1, 9, 0);
/// POSIX threads shim for Windows targets.
pub const PTHREADS4W: Requirement = Requirement::new("pthreads4w", 3, 0, 0);

/// Requirements for one platform, in declaration order.
pub fn requirements(platform: &PlatformContext) -> Vec<Requirement> {
    let mut reqs = vec![LIBSODIUM, OPUS, LIBVPX];
    if platform.os.is_windows() {
        reqs.push(PTHREADS4W);
    }
    reqs
}
