use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// Operating systems with an upstream libtorch distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
  Linux,
  #[serde(rename = "Macos")]
  MacOs,
  Windows,
}

impl Os {
  pub const ALL: [Os; 3] = [Os::Windows, Os::Linux, Os::MacOs];

  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
    }
  }

  /// Returns the settings name accepted on input (`Windows`, `Linux`, `Macos`)
  pub fn setting_name(&self) -> &'static str {
    match self {
      Self::Linux => "Linux",
      Self::MacOs => "Macos",
      Self::Windows => "Windows",
    }
  }

  /// Whether upstream publishes CUDA builds for this OS
  pub fn has_cuda_builds(&self) -> bool {
    !matches!(self, Self::MacOs)
  }
}

impl FromStr for Os {
  type Err = RecipeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|os| os.setting_name() == s)
      .ok_or_else(|| RecipeError::UnsupportedOs(s.to_string()))
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.setting_name())
  }
}
