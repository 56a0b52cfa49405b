//! Staging: copy extracted artifacts into the package layout.
//!
//! | pattern   | from       | to         | layout    |
//! |-----------|------------|------------|-----------|
//! | `*.h`     | `include/` | `include/` | preserved |
//! | `*.lib`   | `lib/`     | `lib/`     | flattened |
//! | `*.dll`   | `lib/`     | `bin/`     | flattened |
//! | `*.so`    | `lib/`     | `lib/`     | flattened |
//! | `*.dylib` | `lib/`     | `lib/`     | flattened |

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{RecipeError, Result};

/// One glob copy pass from the extracted tree into the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyRule {
  pub pattern: &'static str,
  /// Directory under the extracted root that is searched
  pub src: &'static str,
  /// Directory under the package root that receives matches
  pub dst: &'static str,
  /// Keep the path relative to `src`, or flatten to the file name
  pub keep_path: bool,
}

pub const COPY_RULES: [CopyRule; 5] = [
  CopyRule {
    pattern: "*.h",
    src: "include",
    dst: "include",
    keep_path: true,
  },
  CopyRule {
    pattern: "*.lib",
    src: "lib",
    dst: "lib",
    keep_path: false,
  },
  CopyRule {
    pattern: "*.dll",
    src: "lib",
    dst: "bin",
    keep_path: false,
  },
  CopyRule {
    pattern: "*.so",
    src: "lib",
    dst: "lib",
    keep_path: false,
  },
  CopyRule {
    pattern: "*.dylib",
    src: "lib",
    dst: "lib",
    keep_path: false,
  },
];

/// Outcome of a single copy pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
  pub pattern: String,
  pub dst: String,
  pub matched: usize,
}

/// Outcome of all copy passes, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
  pub passes: Vec<PassReport>,
}

impl StageReport {
  pub fn total_files(&self) -> usize {
    self.passes.iter().map(|p| p.matched).sum()
  }

  /// Patterns whose pass copied nothing.
  pub fn empty_patterns(&self) -> Vec<&str> {
    self
      .passes
      .iter()
      .filter(|p| p.matched == 0)
      .map(|p| p.pattern.as_str())
      .collect()
  }
}

/// Copy every file under `source_root/rule.src` matching `rule.pattern`.
///
/// Returns the number of distinct files written. When flattening maps two
/// sources onto one name the later file wins. A missing source directory
/// copies nothing.
pub fn copy_matching(rule: &CopyRule, source_root: &Path, package_root: &Path) -> Result<usize> {
  let pattern = Pattern::new(rule.pattern).map_err(|e| RecipeError::InvalidPattern {
    pattern: rule.pattern.to_string(),
    message: e.to_string(),
  })?;

  let src_dir = source_root.join(rule.src);
  let dst_dir = package_root.join(rule.dst);

  if !src_dir.is_dir() {
    debug!(src = %src_dir.display(), "source directory missing");
    return Ok(0);
  }

  let mut written: HashSet<PathBuf> = HashSet::new();
  for entry in WalkDir::new(&src_dir).sort_by_file_name() {
    let entry = entry.map_err(|e| RecipeError::Io(e.into()))?;
    if !entry.path().is_file() {
      continue;
    }

    let Ok(rel) = entry.path().strip_prefix(&src_dir) else {
      continue;
    };
    if !pattern.matches_path(rel) {
      continue;
    }

    let dest = if rule.keep_path {
      dst_dir.join(rel)
    } else {
      dst_dir.join(entry.file_name())
    };
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(entry.path(), &dest)?;
    if !written.insert(dest.clone()) {
      warn!(
        src = %entry.path().display(),
        dest = %dest.display(),
        "flattened file overwrites an earlier match"
      );
    }
  }

  Ok(written.len())
}

/// Run every copy pass in [`COPY_RULES`] order.
///
/// A pass that matches nothing logs a warning, or fails with
/// [`RecipeError::EmptyStage`] when `strict` is set.
pub fn stage(source_root: &Path, package_root: &Path, strict: bool) -> Result<StageReport> {
  let mut report = StageReport::default();

  for rule in &COPY_RULES {
    let matched = copy_matching(rule, source_root, package_root)?;

    if matched == 0 {
      let source_dir = source_root.join(rule.src).display().to_string();
      if strict {
        return Err(RecipeError::EmptyStage {
          pattern: rule.pattern.to_string(),
          source_dir,
        });
      }
      warn!(pattern = rule.pattern, src = %source_dir, "no files matched copy pattern");
    } else {
      debug!(pattern = rule.pattern, dst = rule.dst, matched, "copied files");
    }

    report.passes.push(PassReport {
      pattern: rule.pattern.to_string(),
      dst: rule.dst.to_string(),
      matched,
    });
  }

  info!(files = report.total_files(), package = %package_root.display(), "staged package");
  Ok(report)
}
