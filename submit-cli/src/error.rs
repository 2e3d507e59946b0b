//! Error handling for the CLI application

use std::fmt;
use std::path::PathBuf;

/// Conditions that end a run with a non-zero exit code
#[derive(Debug)]
pub enum CliError {
    /// No ancestor of the working directory holds a spec file
    SpecNotDiscovered {
        /// Directory the search started from
        start: PathBuf,
        /// Spec file name that was looked for
        file_name: String,
    },
    /// Target directory does not exist
    DirectoryNotFound(PathBuf),
    /// Target exists but is not a directory
    NotADirectory(PathBuf),
    /// The patterns matched no files at all
    NoFilesCollected,
    /// The user declined to continue
    Aborted,
    /// `--check` found patterns without matches
    MissingPatterns(usize),
    /// Configuration file could not be used
    ConfigError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::SpecNotDiscovered { start, file_name } => write!(
                f,
                "No `{file_name}` file found in {} or any parent directory. \
                 Pass the directory to archive explicitly (see --help).",
                start.display()
            ),
            CliError::DirectoryNotFound(path) => {
                write!(f, "Directory {} does not exist.", path.display())
            }
            CliError::NotADirectory(path) => write!(f, "{} is not a directory.", path.display()),
            CliError::NoFilesCollected => write!(f, "No files collected. Aborting."),
            CliError::Aborted => write!(f, "Aborted."),
            CliError::MissingPatterns(1) => write!(f, "1 pattern did not match any files."),
            CliError::MissingPatterns(count) => {
                write!(f, "{count} patterns did not match any files.")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
