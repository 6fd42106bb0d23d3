//! Build pass steps.
//!
//! - **assets**: mirror the media tree into the output tree
//! - **pages**: resolve the root document and write it out
//!
//! The stylesheet step lives in [`crate::utils::sass`].

pub mod assets;
pub mod pages;

use crate::error::{BuildError, BuildResult};
use std::{
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub use assets::copy_media;
pub use pages::write_document;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all regular files under a directory recursively.
///
/// Symlinks are not followed and not returned. Any entry the walk cannot
/// read fails the whole collection with that entry's path.
pub fn collect_all_files(dir: &Path) -> BuildResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|err| walk_error(dir, err))?;
        let name = entry.file_name().to_str().unwrap_or_default();
        if entry.file_type().is_file() && !IGNORED_FILES.contains(&name) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn walk_error(dir: &Path, err: walkdir::Error) -> BuildError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = match err.into_io_error() {
        Some(io_err) => io_err,
        None => io::Error::other("filesystem loop"),
    };
    BuildError::io(path, source)
}
