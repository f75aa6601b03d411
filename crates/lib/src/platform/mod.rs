//! Platform descriptor and the per-platform flag policy.
//!
//! A [`Platform`] is read from the host once (see [`Platform::detect`]) or
//! constructed explicitly, then passed to every resolution call. Nothing
//! else in the crate reads the environment.

pub mod flags;
pub mod os;

use std::fmt;

use os::Os;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{INTERP_DEBUG_ENV, OS_OVERRIDE_ENV};

pub use flags::{DARWIN_HEADERPAD_FLAG, LINUX_NO_DEBUG_FLAG, PlatformFlags, resolve_platform_flags};

/// Target platform of a build: operating system and whether the target
/// interpreter was built with debugging enabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub os: Os,
  pub debug: bool,
}

impl Platform {
  pub fn new(os: Os, debug: bool) -> Self {
    Self { os, debug }
  }

  /// Read the platform from the host environment.
  ///
  /// The OS comes from the running binary unless `EXTSPEC_OS` overrides it.
  /// The debug flag is set when `EXTSPEC_INTERP_DEBUG` holds a truthy value.
  pub fn detect() -> Self {
    let os = match std::env::var(OS_OVERRIDE_ENV) {
      Ok(id) if !id.trim().is_empty() => Os::from_identifier(&id),
      _ => Os::current(),
    };
    let debug = std::env::var(INTERP_DEBUG_ENV).map(|v| is_truthy(&v)).unwrap_or(false);

    let platform = Self { os, debug };
    debug!(os = %platform.os, debug = platform.debug, "detected platform");
    platform
  }

  /// Policy flags for this platform
  pub fn flags(&self) -> PlatformFlags {
    resolve_platform_flags(self)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.debug {
      write!(f, "{} (debug)", self.os)
    } else {
      write!(f, "{}", self.os)
    }
  }
}

fn is_truthy(value: &str) -> bool {
  matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
