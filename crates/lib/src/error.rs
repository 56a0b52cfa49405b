//! Error types for torchpkg-lib.

use thiserror::Error;

use crate::util::hash::DirHashError;

/// Errors that can occur while running the libtorch recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
  /// The requested operating system has no upstream distribution.
  #[error("OS {0} is not supported")]
  UnsupportedOs(String),

  /// HTTP request failed or returned a non-success status.
  #[error("fetch failed for {url}: {message}")]
  FetchFailed { url: String, message: String },

  /// The downloaded file has an extension we cannot unpack.
  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(String),

  /// The archive could not be read.
  #[error("archive error in {path}: {message}")]
  Archive { path: String, message: String },

  /// A copy rule carries a malformed glob pattern.
  #[error("invalid glob pattern '{pattern}': {message}")]
  InvalidPattern { pattern: String, message: String },

  /// A copy pass matched nothing while strict staging was requested.
  #[error("no files matched '{pattern}' under {source_dir}")]
  EmptyStage { pattern: String, source_dir: String },

  /// The output directory holds files that did not come from a previous run.
  #[error("refusing to replace {0}: directory is not empty and has no package_info.json")]
  ForeignPackageDir(String),

  /// Package metadata could not be serialized.
  #[error("metadata error: {0}")]
  Metadata(#[from] serde_json::Error),

  /// The staged package could not be hashed.
  #[error("hash error: {0}")]
  Hash(#[from] DirHashError),

  /// I/O error during fetch, extraction or staging.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Result type for recipe operations
pub type Result<T> = std::result::Result<T, RecipeError>;
