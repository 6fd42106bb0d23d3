//! stitch - a minimal static site builder.
//!
//! One build pass resolves `@include` directives in the root document,
//! compiles `assets/scss/main.scss` with the external sass compiler and
//! mirrors `assets/media` into `dist/`. `stitch dev` builds once, then
//! watches the project and serves `dist/` over HTTP.

mod build;
mod cli;
mod compiler;
mod config;
mod error;
mod include;
mod logger;
mod serve;
mod utils;
mod watch;

use anyhow::{Context, Result};
use build::build_site;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use serve::serve_site;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir().context("Failed to read working directory")?;
    let config: &'static SiteConfig = Box::leak(Box::new(SiteConfig::load(&cli, &root)?));

    if !config.dev {
        return build_site(config).map_err(Into::into);
    }

    // In dev mode a broken initial build is reported, not fatal.
    if let Err(e) = build_site(config) {
        log!("error"; "build failed: {:#}", anyhow::Error::new(e));
    }
    serve_site(config)
}
