//! Test utilities for torchpkg-lib.
//!
//! Builds small stand-ins for upstream libtorch archives so extraction and
//! staging can be exercised without the network.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;

/// Write a zip archive containing the given `(path, content)` entries.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
  let file = File::create(path).unwrap();
  let mut zip = zip::ZipWriter::new(file);
  let options = SimpleFileOptions::default();
  zip.add_directory("libtorch/", options).unwrap();
  for (name, content) in entries {
    zip.start_file(*name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
  }
  zip.finish().unwrap();
}

/// A tar entry for [`write_tar`].
pub enum TarEntry<'a> {
  /// Regular file with `(path, content)`
  File(&'a str, &'a str),
  /// Symbolic link with `(path, target)`
  Symlink(&'a str, &'a str),
  /// Hard link with `(path, target entry)`
  HardLink(&'a str, &'a str),
}

/// Write a tarball, gzip-compressed when `gzip` is set.
pub fn write_tar(path: &Path, entries: &[TarEntry], gzip: bool) {
  let file = File::create(path).unwrap();
  if gzip {
    let encoder = GzEncoder::new(file, Compression::default());
    append_tar_entries(encoder, entries).finish().unwrap();
  } else {
    append_tar_entries(file, entries);
  }
}

fn append_tar_entries<W: Write>(writer: W, entries: &[TarEntry]) -> W {
  let mut builder = tar::Builder::new(writer);
  for entry in entries {
    let mut header = tar::Header::new_gnu();
    header.set_mode(0o644);
    match entry {
      TarEntry::File(name, content) => {
        header.set_size(content.len() as u64);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).unwrap();
      }
      TarEntry::Symlink(name, target) => {
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        builder.append_link(&mut header, name, target).unwrap();
      }
      TarEntry::HardLink(name, target) => {
        header.set_entry_type(tar::EntryType::Link);
        header.set_size(0);
        builder.append_link(&mut header, name, target).unwrap();
      }
    }
  }
  builder.into_inner().unwrap()
}

/// Entries resembling an upstream libtorch archive, with one file per copy rule
/// plus files that no rule picks up.
pub const LIBTORCH_ENTRIES: &[(&str, &str)] = &[
  ("libtorch/include/torch/torch.h", "// torch"),
  ("libtorch/include/torch/csrc/api/include/torch/nn.h", "// nn"),
  ("libtorch/include/c10/core/Device.h", "// device"),
  ("libtorch/include/c10/core/Device.cpp", "// not a header"),
  ("libtorch/lib/torch.lib", "import lib"),
  ("libtorch/lib/c10.dll", "pe"),
  ("libtorch/lib/libtorch.so", "elf"),
  ("libtorch/lib/nested/libc10.so", "elf"),
  ("libtorch/lib/libtorch.dylib", "macho"),
  ("libtorch/share/cmake/Torch/TorchConfig.cmake", "# cmake"),
  ("libtorch/build-version", "1.9.0"),
];
