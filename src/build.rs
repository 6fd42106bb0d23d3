//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── ensure_output_dirs()    dist/, dist/public/css/, dist/public/media/
//!     │
//!     └── rayon::join ────────────┬── copy_media()          assets/media/** → dist/public/media/
//!                                 ├── write_document()      <root> → dist/<root>
//!                                 └── compile_stylesheet()  main.scss → dist/public/css/main.css
//! ```
//!
//! The three steps share no data. All of them are joined before the pass
//! reports success; the first failure in the order above is returned. Nothing
//! already written is rolled back.

use crate::{
    compiler::{copy_media, write_document},
    config::SiteConfig,
    error::{BuildError, BuildResult},
    log,
    utils::sass::compile_stylesheet,
};
use std::{fs, time::Instant};

/// Run one full build pass.
pub fn build_site(config: &SiteConfig) -> BuildResult<()> {
    let started = Instant::now();

    ensure_output_dirs(config)?;

    let (media_result, (document_result, stylesheet_result)) = rayon::join(
        || copy_media(&config.build.media, &config.media_output_dir()),
        || rayon::join(|| write_document(config), || compile_stylesheet(config)),
    );

    let media_count = media_result?;
    document_result?;
    stylesheet_result?;

    log!(
        "build";
        "done in {}ms ({} media files)",
        started.elapsed().as_millis(),
        media_count
    );
    Ok(())
}

/// Create the output tree. Idempotent.
pub fn ensure_output_dirs(config: &SiteConfig) -> BuildResult<()> {
    for dir in [config.css_output_dir(), config.media_output_dir()] {
        fs::create_dir_all(&dir).map_err(|err| BuildError::io(&dir, err))?;
    }
    Ok(())
}
