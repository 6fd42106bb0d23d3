//! Recursive `@include` expansion.
//!
//! # Algorithm
//!
//! ```text
//! expand(text)
//!     │
//!     for each line of the original text (top to bottom)
//!         │
//!         ├── not a directive ──► skip
//!         │
//!         └── @include name
//!                 │
//!                 ├── read <root>/<name>.html
//!                 ├── expand(template)        (depth-first)
//!                 ├── normalize(expansion)
//!                 └── buffer.replace(line, fragment)   (every occurrence)
//! ```
//!
//! Replacement works on the whole working buffer, not on a line index: two
//! byte-identical directive lines expand together, and a later directive can
//! match text spliced in by an earlier one.

use super::{directive::Directive, normalize::normalize};
use crate::error::{BuildError, BuildResult};
use crate::log;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Resolution state for one top-level document.
///
/// `stack` holds the templates currently being expanded; re-entering one of
/// them is a cycle.
pub struct Resolver<'a> {
    root: &'a Path,
    max_depth: usize,
    stack: Vec<String>,
}

impl<'a> Resolver<'a> {
    /// Templates are looked up relative to `root`.
    pub const fn new(root: &'a Path, max_depth: usize) -> Self {
        Self {
            root,
            max_depth,
            stack: Vec::new(),
        }
    }

    /// Expand every directive in `text`.
    ///
    /// The top-level text itself is never normalized.
    pub fn resolve(&mut self, text: &str) -> BuildResult<String> {
        let mut buffer = text.to_owned();

        for line in text.split('\n') {
            let Some(directive) = Directive::parse(line)? else {
                continue;
            };

            let fragment = self.expand_template(&directive)?;
            buffer = buffer.replace(directive.line, &fragment);
        }

        Ok(buffer)
    }

    /// Read, expand and normalize the template a directive points at.
    fn expand_template(&mut self, directive: &Directive<'_>) -> BuildResult<String> {
        let name = directive.name;
        if self.stack.len() >= self.max_depth || self.stack.iter().any(|n| n == name) {
            let mut chain = self.stack.clone();
            chain.push(name.to_owned());
            return Err(BuildError::RecursionLimitExceeded {
                name: name.to_owned(),
                chain,
            });
        }

        let path = self.root.join(directive.file_name());
        log!("include"; "{}", directive.file_name());
        let raw = read_template(&path)?;

        self.stack.push(name.to_owned());
        let expanded = self.resolve(&raw);
        self.stack.pop();

        Ok(normalize(&expanded?))
    }
}

fn read_template(path: &Path) -> BuildResult<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => BuildError::IncludeNotFound {
            path: PathBuf::from(path),
        },
        _ => BuildError::io(path, err),
    })
}

/// Read `path` and expand it with a fresh resolver rooted at `root`.
pub fn resolve_file(path: &Path, root: &Path, max_depth: usize) -> BuildResult<String> {
    let text = fs::read_to_string(path).map_err(|err| BuildError::io(path, err))?;
    Resolver::new(root, max_depth).resolve(&text)
}
