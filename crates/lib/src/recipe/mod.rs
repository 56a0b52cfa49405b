//! The libtorch recipe.
//!
//! A [`Recipe`] runs its phases once, in order:
//! 1. [`Recipe::resolve`] picks the upstream archive URL
//! 2. [`Recipe::build`] fetches and unpacks it into a scratch directory
//! 3. [`Recipe::package`] stages headers and binaries into the package root
//! 4. [`Recipe::package_info`] describes what consumers link against
//!
//! [`Recipe::create`] drives all four and writes `package_info.json`.

pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod resolve;
pub mod stage;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{LIBTORCH_VERSION, PACKAGE_INFO_FILE, PACKAGE_NAME};
use crate::error::{RecipeError, Result};
use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::platform::paths;
use crate::util::hash::{ContentHash, hash_directory};

use metadata::{CppInfo, PackageInfo};
use resolve::Target;
use stage::StageReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
  #[default]
  Release,
  Debug,
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Release => write!(f, "Release"),
      Self::Debug => write!(f, "Debug"),
    }
  }
}

/// Host-supplied settings. The recipe reads these but never chooses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  pub build_type: BuildType,
}

impl Settings {
  /// Fill in whatever the host did not supply from the running platform.
  ///
  /// Returns `None` when a missing value cannot be detected.
  pub fn for_host(os: Option<Os>, arch: Option<Arch>, build_type: BuildType) -> Option<Self> {
    Some(Self {
      os: os.or_else(Os::current)?,
      arch: arch.or_else(Arch::current)?,
      build_type,
    })
  }
}

/// Package options.
///
/// `shared` is recorded only; every upstream archive is a shared build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
  pub shared: bool,
  pub with_cuda: bool,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      shared: true,
      with_cuda: false,
    }
  }
}

/// Where the archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
  /// Download the resolved URL
  Download,
  /// Use an archive already on disk
  Archive(PathBuf),
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct PackageResult {
  pub package_dir: PathBuf,
  pub url: String,
  pub stage: StageReport,
  pub cpp_info: CppInfo,
  pub content_hash: ContentHash,
}

#[derive(Debug, Clone)]
pub struct Recipe {
  pub settings: Settings,
  pub options: Options,
  /// Distribution root the archive URL is built from
  pub mirror: String,
  /// Fail instead of warning when a copy pass matches nothing
  pub strict: bool,
  /// Parent of the per-run scratch directory
  pub scratch_root: PathBuf,
}

impl Recipe {
  pub fn new(settings: Settings, options: Options) -> Self {
    Self {
      settings,
      options,
      mirror: resolve::mirror_from_env(),
      strict: false,
      scratch_root: paths::scratch_dir(),
    }
  }

  pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
    self.mirror = mirror.into();
    self
  }

  pub fn with_strict(mut self, strict: bool) -> Self {
    self.strict = strict;
    self
  }

  pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
    self.scratch_root = scratch_root.into();
    self
  }

  pub fn target(&self) -> Target {
    Target::new(self.settings.os, self.options.with_cuda)
  }

  /// Directory name used for the package under the packages root.
  pub fn package_dir_name(&self) -> String {
    format!(
      "{}-{}-{}-{}",
      PACKAGE_NAME,
      LIBTORCH_VERSION,
      self.settings.os.as_str(),
      self.target().accel.tag()
    )
  }

  /// Default package location under [`paths::packages_dir`].
  pub fn default_package_dir(&self) -> PathBuf {
    paths::packages_dir().join(self.package_dir_name())
  }

  pub fn resolve(&self) -> Result<String> {
    resolve::resolve_url_with_mirror(&self.mirror, self.settings.os.setting_name(), self.options.with_cuda)
  }

  /// Fetch the archive and unpack it under `build_dir/source`.
  ///
  /// Returns the extracted root.
  pub async fn build(&self, url: &str, source: &Source, build_dir: &Path) -> Result<PathBuf> {
    let archive = match source {
      Source::Download => fetch::download(url, &build_dir.join("downloads")).await?,
      Source::Archive(path) => {
        info!(archive = %path.display(), url = %url, "using local archive");
        path.clone()
      }
    };

    let source_dir = build_dir.join("source");
    let dest = source_dir.clone();
    tokio::task::spawn_blocking(move || extract::unpack_archive(&archive, &dest))
      .await
      .map_err(|e| RecipeError::Io(std::io::Error::other(e)))??;

    Ok(source_dir)
  }

  /// Regenerate `package_dir` from the extracted tree.
  ///
  /// Only an empty directory or one holding a previous package is replaced.
  pub fn package(&self, source_dir: &Path, package_dir: &Path) -> Result<StageReport> {
    if package_dir.exists() {
      let is_empty = fs::read_dir(package_dir)?.next().is_none();
      if !is_empty && !package_dir.join(PACKAGE_INFO_FILE).is_file() {
        return Err(RecipeError::ForeignPackageDir(package_dir.display().to_string()));
      }
      debug!(package = %package_dir.display(), "removing previous package");
      fs::remove_dir_all(package_dir)?;
    }
    fs::create_dir_all(package_dir)?;

    stage::stage(source_dir, package_dir, self.strict)
  }

  pub fn package_info(&self) -> CppInfo {
    metadata::package_info(self.options.with_cuda)
  }

  /// Run every phase and leave a complete package in `package_dir`.
  pub async fn create(&self, source: &Source, package_dir: &Path) -> Result<PackageResult> {
    let url = self.resolve()?;

    fs::create_dir_all(&self.scratch_root)?;
    let build_dir = tempfile::Builder::new()
      .prefix("libtorch-")
      .tempdir_in(&self.scratch_root)?;
    debug!(build_dir = %build_dir.path().display(), "created scratch directory");

    let source_dir = self.build(&url, source, build_dir.path()).await?;
    let stage = self.package(&source_dir, package_dir)?;
    let cpp_info = self.package_info();

    metadata::write_package_info(
      package_dir,
      &PackageInfo {
        name: PACKAGE_NAME.to_string(),
        version: LIBTORCH_VERSION.to_string(),
        settings: self.settings,
        options: self.options,
        url: url.clone(),
        cpp_info: cpp_info.clone(),
      },
    )?;

    let content_hash = hash_directory(package_dir)?;
    info!(package = %package_dir.display(), hash = %content_hash, "package created");

    Ok(PackageResult {
      package_dir: package_dir.to_path_buf(),
      url,
      stage,
      cpp_info,
      content_hash,
    })
  }
}

/// Load the metadata of a previously created package.
pub fn load_package_info(package_dir: &Path) -> Result<PackageInfo> {
  debug!(file = PACKAGE_INFO_FILE, package = %package_dir.display(), "reading package info");
  metadata::read_package_info(package_dir)
}
