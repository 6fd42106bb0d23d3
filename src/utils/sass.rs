//! Stylesheet compilation through the external `sass` CLI.
//!
//! Equivalent to:
//!
//! ```text
//! sass --style=expanded --no-source-map --load-path=assets/scss \
//!      assets/scss/main.scss dist/public/css/main.css
//! ```

use crate::config::SiteConfig;
use crate::error::{BuildError, BuildResult};
use crate::exec;
use crate::utils::exec::FilterRule;
use std::path::Path;

/// Sass filter: skip deprecation chatter in successful output.
pub static SASS_FILTER: FilterRule = FilterRule::new(&["DEPRECATION WARNING", "More info"]);

/// Compile the configured entry point into the output stylesheet.
pub fn compile_stylesheet(config: &SiteConfig) -> BuildResult<()> {
    let input = config.stylesheet_entry();
    let output = config.stylesheet_output();

    if !input.is_file() {
        return Err(BuildError::io(
            &input,
            std::io::Error::new(std::io::ErrorKind::NotFound, "stylesheet entry point not found"),
        ));
    }

    run_sass(&config.build.sass.command, &input, &output, &config.build.styles, &config.root)
}

/// Run the compiler with expanded output and `load_path` for imports.
pub fn run_sass(
    command: &[String],
    input: &Path,
    output: &Path,
    load_path: &Path,
    root: &Path,
) -> BuildResult<()> {
    let program = command
        .first()
        .ok_or_else(|| BuildError::StylesheetCompile("empty sass command".into()))?;

    which::which(program).map_err(|_| {
        BuildError::StylesheetCompile(format!("`{program}` not found. Please install it first."))
    })?;

    let mut load_arg = std::ffi::OsString::from("--load-path=");
    load_arg.push(load_path);

    exec!(
        filter=&SASS_FILTER;
        root;
        command;
        "--style=expanded",
        "--no-source-map",
        load_arg,
        input,
        output
    )
    .map_err(|e| BuildError::StylesheetCompile(format!("{e:#}")))?;

    Ok(())
}
