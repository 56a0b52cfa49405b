//! torchpkg-lib: Fetch and repackage prebuilt libtorch distributions
//!
//! The crate is organised around a single [`recipe::Recipe`] that runs four
//! phases in order:
//! - resolve: pick the upstream archive URL for an OS and acceleration mode
//! - fetch: download the archive and unpack it with its root stripped
//! - stage: copy headers and binaries into `include/`, `lib/` and `bin/`
//! - publish: describe the libraries and include dirs consumers link against

pub mod consts;
pub mod error;
pub mod platform;
pub mod recipe;
pub mod util;

pub use error::{RecipeError, Result};
