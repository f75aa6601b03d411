//! Implementation of the `extspec info` command.
//!
//! Shows the target platform and the flags its policy appends.

use anyhow::Result;

use extspec_lib::platform::Platform;

use crate::output::{OutputFormat, print_json, print_list, print_stat};

pub fn cmd_info(platform: &Platform, format: OutputFormat) -> Result<()> {
  let flags = platform.flags();

  if format.is_json() {
    return print_json(&serde_json::json!({ "platform": platform, "flags": flags }));
  }

  println!("Platform:");
  print_stat("OS", platform.os.as_str());
  print_stat("Debug interpreter", if platform.debug { "yes" } else { "no" });
  print_list("Compile additions", &flags.compile);
  print_list("Link additions", &flags.link);
  Ok(())
}
