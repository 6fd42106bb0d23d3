use crate::config::SiteConfig;
use crate::error::{BuildError, BuildResult};
use crate::include::resolve_file;
use crate::log;
use std::fs;

/// Resolve the root document and write it under the output tree.
pub fn write_document(config: &SiteConfig) -> BuildResult<()> {
    let source = config.document_source();
    let output = config.document_output();

    log!("build"; "{}", config.document.display());
    let html = resolve_file(&source, &config.root, config.build.max_depth)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    fs::write(&output, html).map_err(|err| BuildError::io(&output, err))?;

    Ok(())
}
