mod create;
mod info;
mod resolve;

pub use create::{CreateArgs, cmd_create};
pub use info::cmd_info;
pub use resolve::cmd_resolve;

use anyhow::{Context, Result, bail};

use torchpkg_lib::platform::arch::Arch;
use torchpkg_lib::platform::os::Os;
use torchpkg_lib::recipe::BuildType;
use torchpkg_lib::recipe::resolve::mirror_from_env;

use crate::TargetArgs;

/// OS settings name from `--os`, falling back to the host.
fn os_name(target: &TargetArgs) -> Result<String> {
  match &target.os {
    Some(name) => Ok(name.clone()),
    None => Os::current()
      .map(|os| os.setting_name().to_string())
      .context("Could not detect host OS, pass --os"),
  }
}

fn mirror(target: &TargetArgs) -> String {
  target.mirror.clone().unwrap_or_else(mirror_from_env)
}

fn parse_arch(arch: &str) -> Result<Arch> {
  match arch {
    "x86_64" => Ok(Arch::X86_64),
    "aarch64" | "armv8" => Ok(Arch::Aarch64),
    other => bail!("Unsupported architecture: {}", other),
  }
}

fn parse_build_type(build_type: &str) -> Result<BuildType> {
  match build_type {
    "Release" => Ok(BuildType::Release),
    "Debug" => Ok(BuildType::Debug),
    other => bail!("Unsupported build type: {}", other),
  }
}
