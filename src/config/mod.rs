//! Site configuration.
//!
//! Built once at startup from the CLI argument, the built-in defaults and an
//! optional `stitch.toml`, then shared read-only with every component.
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[build]`   | Output/media/style paths, include depth, sass |
//! | `[serve]`   | Development server (interface, port)          |
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"
//! max_depth = 32
//!
//! [build.sass]
//! command = ["npx", "sass"]
//!
//! [serve]
//! port = 3000
//! ```

mod build;
pub mod defaults;
mod error;
mod serve;

use build::BuildConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Optional config file, looked up in the project root.
pub const CONFIG_FILE: &str = "stitch.toml";

/// Stylesheet entry point inside the styles directory.
const STYLESHEET_ENTRY: &str = "main.scss";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing stitch.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute project root (the working directory)
    #[serde(skip)]
    pub root: PathBuf,

    /// Root document filename, relative to `root`
    #[serde(skip)]
    pub document: PathBuf,

    /// Watch + serve mode
    #[serde(skip)]
    pub dev: bool,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Load configuration for a project rooted at `root`.
    ///
    /// `stitch.toml` is read when present; otherwise defaults apply.
    pub fn load(cli: &Cli, root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.update_with_cli(cli, root);
        config.validate()?;
        Ok(config)
    }

    /// Apply the CLI argument and anchor every path at `root`.
    fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        let root = Self::normalize_path(root);

        self.dev = cli.is_dev();
        self.document = PathBuf::from(cli.document());

        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.media = Self::normalize_path(&root.join(&self.build.media));
        self.build.styles = Self::normalize_path(&root.join(&self.build.styles));
        self.root = root;
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.build.max_depth == 0 {
            bail!(ConfigError::Validation(
                "[build.max_depth] must be at least 1".into()
            ));
        }

        if self.build.sass.command.is_empty() {
            bail!(ConfigError::Validation(
                "[build.sass.command] must have at least one element".into()
            ));
        }

        let escapes_root = self
            .document
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if self.document.as_os_str().is_empty() || escapes_root {
            bail!(ConfigError::Validation(format!(
                "root document must be a relative path inside the project, got `{}`",
                self.document.display()
            )));
        }

        Ok(())
    }

    // ========================================================================
    // Derived paths
    // ========================================================================

    /// Source of the root document.
    pub fn document_source(&self) -> PathBuf {
        self.root.join(&self.document)
    }

    /// Where the resolved root document is written.
    pub fn document_output(&self) -> PathBuf {
        self.build.output.join(&self.document)
    }

    /// `dist/public/css`
    pub fn css_output_dir(&self) -> PathBuf {
        self.build.output.join("public").join("css")
    }

    /// `dist/public/media`
    pub fn media_output_dir(&self) -> PathBuf {
        self.build.output.join("public").join("media")
    }

    /// `assets/scss/main.scss`
    pub fn stylesheet_entry(&self) -> PathBuf {
        self.build.styles.join(STYLESHEET_ENTRY)
    }

    /// `dist/public/css/main.css`
    pub fn stylesheet_output(&self) -> PathBuf {
        self.css_output_dir().join("main.css")
    }

    /// Whether `path` lies inside the output tree.
    pub fn is_output_path(&self, path: &Path) -> bool {
        path.starts_with(&self.build.output)
    }
}

// ============================================================================
// Tests
// ============================================================================
