//! # Streamorder Application
//!
//! Command-line front end for `streamorder-core`. The library target exposes
//! the CLI and configuration layers so they can be driven from tests.

pub mod cli;
pub mod config;
