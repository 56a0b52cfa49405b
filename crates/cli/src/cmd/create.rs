//! Implementation of the `torchpkg create` command.
//!
//! Resolves the archive for the requested target, fetches and unpacks it in
//! a scratch directory, stages the package and writes its metadata.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use torchpkg_lib::platform::os::Os;
use torchpkg_lib::recipe::{Options, Recipe, Settings, Source};

use super::{mirror, parse_arch, parse_build_type};
use crate::TargetArgs;
use crate::output::{
  OutputFormat, format_duration, print_info, print_json, print_stat, print_success, print_warning, truncate_hash,
};

pub struct CreateArgs {
  pub target: TargetArgs,
  pub arch: Option<String>,
  pub build_type: String,
  pub shared: bool,
  pub archive: Option<PathBuf>,
  pub output_dir: Option<PathBuf>,
  pub strict: bool,
  pub output: OutputFormat,
}

pub fn cmd_create(args: CreateArgs) -> Result<()> {
  let start = Instant::now();

  let os = args.target.os.as_deref().map(str::parse::<Os>).transpose()?;
  let arch = args.arch.as_deref().map(parse_arch).transpose()?;
  let settings = Settings::for_host(os, arch, parse_build_type(&args.build_type)?)
    .context("Could not detect host platform, pass --os and --arch")?;
  let options = Options {
    shared: args.shared,
    with_cuda: args.target.cuda,
  };

  let recipe = Recipe::new(settings, options)
    .with_mirror(mirror(&args.target))
    .with_strict(args.strict);

  let package_dir = args.output_dir.unwrap_or_else(|| recipe.default_package_dir());
  let source = match args.archive {
    Some(path) => Source::Archive(path),
    None => Source::Download,
  };

  info!(os = %settings.os, arch = %settings.arch, cuda = options.with_cuda, "creating package");

  // Extraction uses spawn_blocking, so a current-thread runtime is enough
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;
  let result = rt
    .block_on(recipe.create(&source, &package_dir))
    .context("Package creation failed")?;

  if args.output.is_json() {
    print_json(&result)?;
    return Ok(());
  }

  let empty = result.stage.empty_patterns();
  if !empty.is_empty() {
    print_warning(&format!("No files matched: {}", empty.join(", ")));
  }
  if options.with_cuda && !settings.os.has_cuda_builds() {
    print_info("No CUDA distribution for Macos, packaged the CPU build");
  }

  println!();
  print_success("Package created!");
  print_stat("Package", &result.package_dir.display().to_string());
  print_stat("Source", &result.url);
  for pass in &result.stage.passes {
    print_stat(&format!("{} -> {}/", pass.pattern, pass.dst), &pass.matched.to_string());
  }
  print_stat("Libraries", &result.cpp_info.libs.join(", "));
  print_stat("Include dirs", &result.cpp_info.includedirs.join(", "));
  print_stat("Content hash", truncate_hash(&result.content_hash.0));
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
