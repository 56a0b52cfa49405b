//! Shared test helpers for CLI integration tests.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Entries resembling an upstream libtorch archive.
pub const LIBTORCH_ENTRIES: &[(&str, &str)] = &[
  ("libtorch/include/torch/torch.h", "// torch"),
  ("libtorch/include/torch/csrc/api/include/torch/all.h", "// all"),
  ("libtorch/lib/libtorch.so", "elf"),
  ("libtorch/lib/libc10.so", "elf"),
  ("libtorch/lib/torch.lib", "import lib"),
  ("libtorch/lib/torch.dll", "pe"),
  ("libtorch/lib/libtorch.dylib", "macho"),
];

/// Isolated test environment.
///
/// Each test gets its own temporary directory for packages, scratch space
/// and archive fixtures.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a zip archive under the temp directory and return its path.
  pub fn write_archive(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = self.temp.path().join(name);
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();
    for (entry, content) in entries {
      zip.start_file(*entry, options).unwrap();
      zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
  }

  /// Default root for created packages.
  pub fn packages_path(&self) -> PathBuf {
    let p = self.temp.path().join("packages");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Cache path holding the build scratch directories.
  pub fn cache_path(&self) -> PathBuf {
    let p = self.temp.path().join("cache");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Get a pre-configured Command for the torchpkg binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `TORCHPKG_ROOT`: Isolated package root
  /// - `XDG_CACHE_HOME` / `LOCALAPPDATA`: Isolated scratch space
  pub fn torchpkg_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("torchpkg");
    cmd.env("TORCHPKG_ROOT", self.packages_path());
    cmd.env("XDG_CACHE_HOME", self.cache_path());
    cmd.env("LOCALAPPDATA", self.cache_path()); // For Windows
    cmd.env_remove("TORCHPKG_MIRROR");
    cmd
  }
}
