/// Default project file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "extspec.toml";

/// Length of truncated object hashes
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Overrides the detected operating system identifier
pub const OS_OVERRIDE_ENV: &str = "EXTSPEC_OS";

/// Marks the target interpreter as a debug build
pub const INTERP_DEBUG_ENV: &str = "EXTSPEC_INTERP_DEBUG";
