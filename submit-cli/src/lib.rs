//! submit CLI library
//!
//! This library provides the command-line interface that packages a homework
//! directory into a zip archive according to its `.submit` file.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod prompt;

pub use error::{CliError, CliResult};
