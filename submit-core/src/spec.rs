//! `.submit` spec file parsing
//!
//! A spec file lists one glob pattern per line. Everything from the first `#`
//! on a line is a comment; blank lines are ignored.

use crate::error::{Result, SubmitError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default name of the spec file inside a submission directory
pub const SPEC_FILE_NAME: &str = ".submit";

/// Glob pattern relative to the base directory
pub type Pattern = String;

/// Location of the spec file for a given base directory
pub fn spec_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

/// Read and parse the spec file at `path`
pub fn parse_spec(path: &Path) -> Result<Vec<Pattern>> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SubmitError::SpecNotFound {
            path: path.to_path_buf(),
        },
        _ => SubmitError::io(path, e),
    })?;

    Ok(parse_spec_str(&text))
}

/// Parse spec text into patterns, preserving line order
///
/// Patterns are not validated here. A malformed glob simply matches nothing
/// later on.
pub fn parse_spec_str(text: &str) -> Vec<Pattern> {
    text.lines()
        .map(|line| match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Walk up from `start` to the nearest directory containing a spec file
///
/// Only regular files count: a directory that happens to carry the spec
/// file's name is passed over and the search continues upward, since it
/// could never be parsed.
pub fn find_spec_dir(start: &Path, file_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| spec_path(dir, file_name).is_file())
        .map(Path::to_path_buf)
}
