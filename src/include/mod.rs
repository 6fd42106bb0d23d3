//! HTML include resolution.
//!
//! - **directive**: recognize `@include <name>` lines
//! - **normalize**: flatten whitespace and strip wrapper tags from fragments
//! - **resolve**: recursive expansion with cycle and depth checks

pub mod directive;
pub mod normalize;
pub mod resolve;

pub use resolve::resolve_file;
