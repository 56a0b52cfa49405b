//! Upstream URL resolution.
//!
//! Maps an operating system and acceleration mode onto one of the three
//! archives published for libtorch 1.9.0.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{CPU_TAG, CUDA_TAG, DEFAULT_MIRROR, LIBTORCH_VERSION, MIRROR_ENV};
use crate::error::Result;
use crate::platform::os::Os;

/// Acceleration mode of the packaged binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accel {
  Cpu,
  Cuda,
}

impl Accel {
  pub fn from_flag(with_cuda: bool) -> Self {
    if with_cuda { Self::Cuda } else { Self::Cpu }
  }

  /// Upstream directory tag (`cpu` or `cu111`)
  pub fn tag(&self) -> &'static str {
    match self {
      Self::Cpu => CPU_TAG,
      Self::Cuda => CUDA_TAG,
    }
  }
}

/// The pair that selects an upstream archive.
///
/// macOS has no CUDA distribution, so a CUDA request on macOS is downgraded
/// to CPU here rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
  pub os: Os,
  pub accel: Accel,
}

impl Target {
  pub fn new(os: Os, with_cuda: bool) -> Self {
    let accel = if with_cuda && !os.has_cuda_builds() {
      warn!(os = %os, "no CUDA distribution upstream, using the CPU archive");
      Accel::Cpu
    } else {
      Accel::from_flag(with_cuda)
    };
    Self { os, accel }
  }

  /// Archive URL under the given distribution root.
  pub fn url(&self, mirror: &str) -> String {
    let base = mirror.trim_end_matches('/');
    let tag = self.accel.tag();
    match self.os {
      Os::Windows => format!("{base}/{tag}/libtorch-win-shared-with-deps-{LIBTORCH_VERSION}+{tag}.zip"),
      Os::Linux => format!("{base}/{tag}/libtorch-cxx11-abi-shared-with-deps-{LIBTORCH_VERSION}+{tag}.zip"),
      Os::MacOs => format!("{base}/{CPU_TAG}/libtorch-macos-{LIBTORCH_VERSION}.zip"),
    }
  }
}

/// Returns the distribution root, honouring `TORCHPKG_MIRROR`.
pub fn mirror_from_env() -> String {
  std::env::var(MIRROR_ENV)
    .ok()
    .filter(|m| !m.is_empty())
    .unwrap_or_else(|| DEFAULT_MIRROR.to_string())
}

/// Resolve the upstream archive URL for an OS settings name and CUDA flag.
///
/// Fails with [`RecipeError::UnsupportedOs`](crate::RecipeError::UnsupportedOs)
/// for anything other than `Windows`, `Linux` or `Macos`.
pub fn resolve_url(os_name: &str, with_cuda: bool) -> Result<String> {
  resolve_url_with_mirror(DEFAULT_MIRROR, os_name, with_cuda)
}

/// Same as [`resolve_url`] but against an alternate distribution root.
pub fn resolve_url_with_mirror(mirror: &str, os_name: &str, with_cuda: bool) -> Result<String> {
  let os: Os = os_name.parse()?;
  let url = Target::new(os, with_cuda).url(mirror);
  debug!(os = %os, with_cuda, url = %url, "resolved archive URL");
  Ok(url)
}
