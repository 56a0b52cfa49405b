use anyhow::Result;

use torchpkg_lib::recipe::resolve::resolve_url_with_mirror;

use super::{mirror, os_name};
use crate::TargetArgs;

pub fn cmd_resolve(target: &TargetArgs) -> Result<()> {
  let os = os_name(target)?;
  let url = resolve_url_with_mirror(&mirror(target), &os, target.cuda)?;
  println!("{}", url);
  Ok(())
}
