//! CLI utilities for narrasync.
//!
//! This crate provides the configuration and output helpers shared by the
//! command-line tools.

pub mod config;
pub mod output;

pub use config::{Config, Context};
pub use output::{Output, OutputFormat, print_verbose};
