//! Implementation of the `extspec package` command.
//!
//! Prints the package descriptor: metadata, layout and install requirements.

use std::path::Path;

use anyhow::{Context, Result};

use extspec_lib::config::ProjectConfig;
use extspec_lib::platform::Platform;

use crate::output::{OutputFormat, print_info, print_json, print_list, print_stat, print_success};

pub fn cmd_package(config: &Path, platform: &Platform, format: OutputFormat) -> Result<()> {
  let project = ProjectConfig::load(config)?;
  let package = project
    .resolve(platform)
    .with_context(|| format!("Failed to resolve {}", config.display()))?
    .package;

  if format.is_json() {
    return print_json(&package);
  }

  print_success(&format!("Package {} {}", package.name, package.version));
  if !package.description.is_empty() {
    print_stat("Description", &package.description);
  }
  for (label, value) in [
    ("URL", &package.url),
    ("Author", &package.author),
    ("License", &package.license),
    ("Python", &package.python_requires),
  ] {
    if let Some(value) = value {
      print_stat(label, value);
    }
  }
  print_list("Packages", &package.packages);
  let layout: Vec<_> = package
    .package_dir
    .iter()
    .map(|(name, dir)| format!("{:?} -> {}", name, dir))
    .collect();
  print_list("Package dirs", &layout);
  let modules: Vec<_> = package
    .ext_modules
    .iter()
    .map(|(module, sources)| format!("{} <- {}", module, sources.join(", ")))
    .collect();
  print_list("Extension modules", &modules);
  print_list("Install requires", &package.install_requires);

  println!();
  print_info("The numeric library requirement assumes newer releases stay ABI compatible.");
  Ok(())
}
