//! Implementation of the `extspec resolve` command.
//!
//! Loads a project file, resolves every extension for the target platform
//! and prints the resulting build specifications.

use std::path::Path;

use anyhow::{Context, Result};

use extspec_lib::config::ProjectConfig;
use extspec_lib::platform::Platform;
use extspec_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_json, print_list, print_stat, print_success, truncate_hash};

pub fn cmd_resolve(config: &Path, platform: &Platform, format: OutputFormat) -> Result<()> {
  let project = ProjectConfig::load(config)?;
  let resolution = project
    .resolve(platform)
    .with_context(|| format!("Failed to resolve {}", config.display()))?;
  let hash = resolution.compute_hash().context("Failed to compute fingerprint")?;

  if format.is_json() {
    return print_json(&serde_json::json!({
      "fingerprint": hash,
      "platform": resolution.platform,
      "extensions": resolution.extensions,
    }));
  }

  print_success(&format!(
    "Resolved {} extension(s) for {} [{}]",
    resolution.extensions.len(),
    resolution.platform,
    truncate_hash(&hash.0)
  ));

  for spec in &resolution.extensions {
    println!();
    println!("Extension: {}", spec.name);
    print_list("Sources", &spec.sources);
    let include_dirs: Vec<_> = spec.include_dirs.iter().map(|d| d.display().to_string()).collect();
    print_list("Include dirs", &include_dirs);
    print_list("Macros", &spec.define_macros);
    print_list("Compile args", &spec.extra_compile_args);
    print_list("Link args", &spec.extra_link_args);
    print_list("Libraries", &spec.libraries);
    print_list("DSOs", &spec.dsos);
  }

  println!();
  print_stat("Fingerprint", &hash.0);
  Ok(())
}
