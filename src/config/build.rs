//! `[build]` section configuration.
//!
//! Contains build paths, the include depth ceiling and the sass command.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in stitch.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "dist"          # Output tree
/// media = "assets/media"   # Copied verbatim to dist/public/media
/// styles = "assets/scss"   # Holds main.scss, also the sass load path
/// max_depth = 64           # Include nesting ceiling
///
/// [build.sass]
/// command = ["sass"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory, relative to the project root.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Media source directory.
    #[serde(default = "defaults::build::media")]
    #[educe(Default = defaults::build::media())]
    pub media: PathBuf,

    /// Stylesheet source directory.
    #[serde(default = "defaults::build::styles")]
    #[educe(Default = defaults::build::styles())]
    pub styles: PathBuf,

    /// Maximum include nesting before resolution fails.
    #[serde(default = "defaults::build::max_depth")]
    #[educe(Default = defaults::build::max_depth())]
    pub max_depth: usize,

    /// External stylesheet compiler.
    #[serde(default)]
    pub sass: SassConfig,
}

/// `[build.sass]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SassConfig {
    /// Program and leading arguments, e.g. `["npx", "sass"]`.
    #[serde(default = "defaults::build::sass::command")]
    #[educe(Default = defaults::build::sass::command())]
    pub command: Vec<String>,
}
