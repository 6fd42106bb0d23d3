//! Utilities for external collaborators.
//!
//! - **exec**: run external commands, filter and log their output
//! - **sass**: compile the stylesheet entry point

pub mod exec;
pub mod sass;
