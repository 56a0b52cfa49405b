use std::path::Path;

use anyhow::{Context, Result};

use torchpkg_lib::consts::LIBTORCH_VERSION;
use torchpkg_lib::platform::platform_triple;
use torchpkg_lib::recipe::load_package_info;
use torchpkg_lib::recipe::metadata::{CppInfo, package_info};

use crate::output::print_stat;

pub fn cmd_info(cuda: bool, package: Option<&Path>, cargo: bool) -> Result<()> {
  let cpp_info: CppInfo = match package {
    Some(dir) => {
      load_package_info(dir)
        .with_context(|| format!("Failed to read package info from {}", dir.display()))?
        .cpp_info
    }
    None => package_info(cuda),
  };

  if cargo {
    let root = package.unwrap_or_else(|| Path::new("."));
    for line in cpp_info.cargo_directives(root) {
      println!("{}", line);
    }
    return Ok(());
  }

  println!("System:");
  match platform_triple() {
    Some(triple) => print_stat("Platform", &triple),
    _ => println!("Could not detect platform."),
  }
  println!();
  println!("libtorch {}:", LIBTORCH_VERSION);
  print_stat("Libraries", &cpp_info.libs.join(", "));
  print_stat("Include dirs", &cpp_info.includedirs.join(", "));
  print_stat("Lib dirs", &cpp_info.libdirs.join(", "));
  print_stat("Bin dirs", &cpp_info.bindirs.join(", "));

  Ok(())
}
