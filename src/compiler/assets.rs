use crate::compiler::collect_all_files;
use crate::error::{BuildError, BuildResult};
use crate::log;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Mirror every regular file under `source` into `dest`.
///
/// Directories are created on demand. Files are copied in parallel and all
/// copies finish before this returns. A missing `source` copies nothing; an
/// unreadable entry below it fails the copy.
/// Returns the number of files copied.
pub fn copy_media(source: &Path, dest: &Path) -> BuildResult<usize> {
    if !source.is_dir() {
        log!("media"; "{} not found, skipping", source.display());
        return Ok(0);
    }

    let files = collect_all_files(source)?;

    files.par_iter().try_for_each(|path| copy_file(path, source, dest))?;

    Ok(files.len())
}

fn copy_file(path: &Path, source: &Path, dest: &Path) -> BuildResult<()> {
    let rel_path = path
        .strip_prefix(source)
        .map_err(|_| BuildError::io(path, std::io::Error::other("path outside media directory")))?;
    let output_path = dest.join(rel_path);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }

    fs::copy(path, &output_path).map_err(|err| BuildError::io(&output_path, err))?;
    Ok(())
}
