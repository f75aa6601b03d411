//! Platform-conditional toolchain flags.
//!
//! | Platform            | compile  | link                               |
//! |---------------------|----------|------------------------------------|
//! | linux, non-debug    | `-g0`    |                                    |
//! | Darwin, any         |          | `-Wl,-headerpad_max_install_names` |
//! | anything else       |          |                                    |
//!
//! Linux release builds drop debug symbols, which are many times the size of
//! the code itself. On macOS the load commands need spare header room so that
//! install names can be rewritten after linking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Platform;
use super::os::Os;

pub const LINUX_NO_DEBUG_FLAG: &str = "-g0";
pub const DARWIN_HEADERPAD_FLAG: &str = "-Wl,-headerpad_max_install_names";

/// Flags appended after the dependency-provided baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFlags {
  pub compile: Vec<String>,
  pub link: Vec<String>,
}

impl PlatformFlags {
  pub fn is_empty(&self) -> bool {
    self.compile.is_empty() && self.link.is_empty()
  }
}

/// Look up the flag additions for a platform.
///
/// Unrecognised platforms get no additions.
pub fn resolve_platform_flags(platform: &Platform) -> PlatformFlags {
  let flags = match (&platform.os, platform.debug) {
    (Os::Linux, false) => PlatformFlags {
      compile: vec![LINUX_NO_DEBUG_FLAG.to_string()],
      link: Vec::new(),
    },
    (Os::Darwin, _) => PlatformFlags {
      compile: Vec::new(),
      link: vec![DARWIN_HEADERPAD_FLAG.to_string()],
    },
    (Os::Linux, true) | (Os::Windows, _) | (Os::Other(_), _) => PlatformFlags::default(),
  };

  debug!(platform = %platform, compile = ?flags.compile, link = ?flags.link, "resolved platform flags");
  flags
}
