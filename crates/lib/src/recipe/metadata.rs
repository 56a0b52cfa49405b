//! Link metadata published for consumers of a staged package.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PACKAGE_INFO_FILE;
use crate::error::Result;
use crate::recipe::{Options, Settings};

pub const BASE_LIBS: [&str; 2] = ["torch", "c10"];
pub const CUDA_LIBS: [&str; 2] = ["torch_cuda", "c10_cuda"];
pub const INCLUDE_DIRS: [&str; 2] = ["include", "include/torch/csrc/api/include"];

/// What a consumer needs to compile and link against the package.
///
/// Directories are relative to the package root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
  pub libs: Vec<String>,
  pub includedirs: Vec<String>,
  pub libdirs: Vec<String>,
  pub bindirs: Vec<String>,
}

impl CppInfo {
  /// Render as Cargo build-script directives rooted at `package_root`.
  pub fn cargo_directives(&self, package_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for dir in &self.libdirs {
      lines.push(format!(
        "cargo:rustc-link-search=native={}",
        package_root.join(dir).display()
      ));
    }
    for lib in &self.libs {
      lines.push(format!("cargo:rustc-link-lib=dylib={lib}"));
    }
    for dir in &self.includedirs {
      lines.push(format!("cargo:include={}", package_root.join(dir).display()));
    }
    lines
  }
}

/// Build the link metadata.
///
/// The CUDA libraries follow the requested option, not the archive that was
/// actually fetched.
pub fn package_info(with_cuda: bool) -> CppInfo {
  let mut libs: Vec<String> = BASE_LIBS.iter().map(|s| s.to_string()).collect();
  if with_cuda {
    libs.extend(CUDA_LIBS.iter().map(|s| s.to_string()));
  }

  CppInfo {
    libs,
    includedirs: INCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
    libdirs: vec!["lib".to_string()],
    bindirs: vec!["bin".to_string()],
  }
}

/// The `package_info.json` document written at the package root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
  pub settings: Settings,
  pub options: Options,
  pub url: String,
  pub cpp_info: CppInfo,
}

pub fn write_package_info(package_root: &Path, info: &PackageInfo) -> Result<PathBuf> {
  let path = package_root.join(PACKAGE_INFO_FILE);
  let json = serde_json::to_string_pretty(info)?;
  fs::write(&path, json)?;
  debug!(path = %path.display(), "wrote package info");
  Ok(path)
}

pub fn read_package_info(package_root: &Path) -> Result<PackageInfo> {
  let content = fs::read_to_string(package_root.join(PACKAGE_INFO_FILE))?;
  Ok(serde_json::from_str(&content)?)
}
