//! Archive extraction with the top-level directory stripped.
//!
//! Upstream archives wrap everything in a single `libtorch/` root. Dropping
//! the first component of every entry puts `include/` and `lib/` directly
//! under the destination.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use tracing::{debug, info, warn};

use crate::error::{RecipeError, Result};

/// Unpack an archive to the destination directory
///
/// Supports:
/// - `.zip`
/// - `.tar.gz` / `.tgz`
/// - `.tar`
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<()> {
  let name = archive_path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| RecipeError::UnsupportedArchive(archive_path.display().to_string()))?;

  fs::create_dir_all(dest)?;

  if name.ends_with(".zip") {
    unpack_zip(archive_path, dest)?;
  } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
    let file = File::open(archive_path)?;
    unpack_tar(Archive::new(GzDecoder::new(BufReader::new(file))), archive_path, dest)?;
  } else if name.ends_with(".tar") {
    let file = File::open(archive_path)?;
    unpack_tar(Archive::new(BufReader::new(file)), archive_path, dest)?;
  } else {
    return Err(RecipeError::UnsupportedArchive(name.to_string()));
  }

  info!(dest = %dest.display(), "unpacked archive");
  Ok(())
}

/// Drop the archive root from an entry path.
///
/// Returns `None` for the root itself and for entries that would escape the
/// destination.
fn strip_root(path: &Path) -> Option<PathBuf> {
  let mut components = path.components().skip_while(|c| matches!(c, Component::CurDir));
  if !matches!(components.next(), Some(Component::Normal(_))) {
    warn!(entry = %path.display(), "skipping archive entry outside the archive root");
    return None;
  }
  let stripped: PathBuf = components.collect();
  if stripped.as_os_str().is_empty() {
    return None;
  }
  if !stripped.components().all(|c| matches!(c, Component::Normal(_))) {
    warn!(entry = %path.display(), "skipping archive entry outside the archive root");
    return None;
  }
  Some(stripped)
}

/// Whether a symlink target stays within the directory that holds the link.
fn is_safe_link_target(target: &Path) -> bool {
  !target.as_os_str().is_empty()
    && target
      .components()
      .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Whether any directory between `dest` and the entry at `rel` is a symlink.
///
/// Writing through such a directory could land outside `dest`.
fn crosses_symlink(dest: &Path, rel: &Path) -> bool {
  let Some(parent) = rel.parent() else {
    return false;
  };
  let mut current = dest.to_path_buf();
  for component in parent.components() {
    current.push(component);
    if fs::symlink_metadata(&current).is_ok_and(|m| m.file_type().is_symlink()) {
      return true;
    }
  }
  false
}

/// Remove a symlink sitting where an entry is about to be written.
fn clear_symlink(dest_path: &Path) -> Result<()> {
  if fs::symlink_metadata(dest_path).is_ok_and(|m| m.file_type().is_symlink()) {
    fs::remove_file(dest_path)?;
  }
  Ok(())
}

fn archive_error(archive_path: &Path, err: impl std::fmt::Display) -> RecipeError {
  RecipeError::Archive {
    path: archive_path.display().to_string(),
    message: err.to_string(),
  }
}

fn unpack_tar<R: Read>(mut archive: Archive<R>, archive_path: &Path, dest: &Path) -> Result<()> {
  let mut count = 0usize;
  for entry in archive.entries().map_err(|e| archive_error(archive_path, e))? {
    let mut entry = entry.map_err(|e| archive_error(archive_path, e))?;
    let path = entry.path().map_err(|e| archive_error(archive_path, e))?.into_owned();

    let Some(stripped) = strip_root(&path) else {
      continue;
    };

    if crosses_symlink(dest, &stripped) {
      warn!(entry = %path.display(), "skipping archive entry below a symlink");
      continue;
    }

    let dest_path = dest.join(&stripped);
    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent)?;
    }
    clear_symlink(&dest_path)?;

    match entry.header().entry_type() {
      EntryType::Symlink => {
        let safe = entry
          .link_name()
          .map_err(|e| archive_error(archive_path, e))?
          .is_some_and(|target| is_safe_link_target(&target));
        if !safe {
          warn!(entry = %path.display(), "skipping symlink pointing outside its directory");
          continue;
        }
      }
      EntryType::Link => {
        // Hard link targets name another entry, so they carry the archive root too
        let target = entry
          .link_name()
          .map_err(|e| archive_error(archive_path, e))?
          .and_then(|target| strip_root(&target));
        let Some(target) = target.filter(|t| !crosses_symlink(dest, t)) else {
          warn!(entry = %path.display(), "skipping hard link outside the archive root");
          continue;
        };
        fs::hard_link(dest.join(target), &dest_path)?;
        count += 1;
        continue;
      }
      _ => {}
    }

    entry.unpack(&dest_path).map_err(|e| archive_error(archive_path, e))?;
    count += 1;
  }

  debug!(entries = count, "tar entries unpacked");
  Ok(())
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<()> {
  let file = File::open(archive_path)?;
  let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(archive_path, e))?;

  for i in 0..archive.len() {
    let mut file = archive.by_index(i).map_err(|e| archive_error(archive_path, e))?;

    let Some(path) = file.enclosed_name() else {
      warn!(entry = file.name(), "skipping zip entry with unsafe name");
      continue;
    };

    let Some(stripped) = strip_root(&path) else {
      continue;
    };

    if crosses_symlink(dest, &stripped) {
      warn!(entry = %path.display(), "skipping archive entry below a symlink");
      continue;
    }

    let dest_path = dest.join(&stripped);

    if file.is_dir() {
      fs::create_dir_all(&dest_path)?;
    } else {
      if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
      }
      clear_symlink(&dest_path)?;

      let mut outfile = File::create(&dest_path)?;
      std::io::copy(&mut file, &mut outfile)?;

      #[cfg(unix)]
      {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = file.unix_mode() {
          fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode))?;
        }
      }
    }
  }

  debug!(entries = archive.len(), "zip entries unpacked");
  Ok(())
}
