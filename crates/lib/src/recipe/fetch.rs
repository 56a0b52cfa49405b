//! Archive download.
//!
//! Streams the resolved URL into the build's `downloads/` directory. There is
//! no checksum, retry or cross-run cache: every run fetches a fresh copy.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{RecipeError, Result};

/// Download `url` into `downloads_dir`, returning the path of the saved file.
pub async fn download(url: &str, downloads_dir: &Path) -> Result<PathBuf> {
  info!(url = %url, "fetching URL");

  fs::create_dir_all(downloads_dir).await?;
  let dest_path = downloads_dir.join(url_to_filename(url));

  let mut response = reqwest::get(url).await.map_err(|e| fetch_failed(url, e))?;

  if !response.status().is_success() {
    return Err(RecipeError::FetchFailed {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }

  if let Some(len) = response.content_length() {
    debug!(url = %url, bytes = len, "response size");
  }

  let mut file = fs::File::create(&dest_path).await?;
  let mut written: u64 = 0;
  while let Some(chunk) = response.chunk().await.map_err(|e| fetch_failed(url, e))? {
    file.write_all(&chunk).await?;
    written += chunk.len() as u64;
  }
  file.flush().await?;

  info!(path = ?dest_path, size = written, "download complete");

  Ok(dest_path)
}

fn fetch_failed(url: &str, err: reqwest::Error) -> RecipeError {
  RecipeError::FetchFailed {
    url: url.to_string(),
    message: err.to_string(),
  }
}

/// Convert a URL to a safe filename.
///
/// Takes the last path component and sanitizes it. Falls back to hash of URL
/// if no suitable filename can be extracted.
pub fn url_to_filename(url: &str) -> String {
  if let Some(filename) = url.rsplit('/').next() {
    let filename = filename.split('?').next().unwrap_or(filename);

    // Only alphanumeric, dash, underscore and dot survive
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  let mut hasher = Sha256::new();
  hasher.update(url.as_bytes());
  format!("download_{}", &hex::encode(hasher.finalize())[..16])
}
