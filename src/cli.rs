//! Command-line interface definitions.
//!
//! The CLI takes a single optional positional argument: the root document to
//! build, or `dev` to build, watch and serve.

use clap::Parser;

/// Root document built when none is given.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Positional value that switches to watch + serve mode.
pub const DEV_MODE: &str = "dev";

/// stitch static site builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root document to build, or `dev` to build, watch and serve
    #[arg(default_value = DEFAULT_DOCUMENT)]
    pub target: String,
}

impl Cli {
    /// `dev` enables watch + serve mode.
    pub fn is_dev(&self) -> bool {
        self.target == DEV_MODE
    }

    /// The root document filename; `dev` always builds the default document.
    pub fn document(&self) -> &str {
        if self.is_dev() {
            DEFAULT_DOCUMENT
        } else {
            &self.target
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stitch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_document() {
        let cli = parse(&[]);
        assert!(!cli.is_dev());
        assert_eq!(cli.document(), "index.html");
    }

    #[test]
    fn test_custom_document() {
        let cli = parse(&["about.html"]);
        assert!(!cli.is_dev());
        assert_eq!(cli.document(), "about.html");
    }

    #[test]
    fn test_dev_forces_default_document() {
        let cli = parse(&["dev"]);
        assert!(cli.is_dev());
        assert_eq!(cli.document(), "index.html");
    }

    #[test]
    fn test_extra_arguments_rejected() {
        let result = Cli::try_parse_from(["stitch", "a.html", "b.html"]);
        assert!(result.is_err());
    }
}
