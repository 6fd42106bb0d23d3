//! Build error types.
//!
//! Every failure inside a build pass is a [`BuildError`]. Application glue
//! (CLI, server setup) wraps these in `anyhow` like everything else.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors that abort a single build pass.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An `@include` line without a template name.
    #[error("malformed directive, expected `@include <name>`: `{line}`")]
    MalformedDirective { line: String },

    /// The template referenced by a directive does not exist.
    #[error("include not found: `{}`", path.display())]
    IncludeNotFound { path: PathBuf },

    /// Include cycle, or nesting deeper than `build.max_depth`.
    #[error("include recursion limit exceeded at `{name}` (chain: {})", chain.join(" -> "))]
    RecursionLimitExceeded { name: String, chain: Vec<String> },

    /// The external stylesheet compiler is missing or failed.
    #[error("stylesheet compile failed: {0}")]
    StylesheetCompile(String),

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Tag an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
