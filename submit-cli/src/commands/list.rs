//! List command implementation

use super::Session;
use crate::output::PathListWriter;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use submit_core::entry_name;

/// Print the collected files, relative to the base directory and sorted
///
/// Files outside the base directory cannot be archived; they are listed by
/// absolute path with a warning.
pub fn run(session: &Session, out: &mut dyn Write) -> Result<()> {
    let collection = session.collect()?;
    let base = fs::canonicalize(&session.base)
        .with_context(|| format!("Failed to resolve {}", session.base.display()))?;

    let mut names: Vec<String> = collection
        .files
        .iter()
        .map(|file| {
            entry_name(&base, file).unwrap_or_else(|_| {
                log::warn!("{} is outside of {}", file.display(), base.display());
                file.display().to_string()
            })
        })
        .collect();
    names.sort();

    let mut writer = PathListWriter::new(out);
    for name in &names {
        writer.write_path(name)?;
    }
    let written = writer.finish()?;
    log::debug!("Listed {written} files");

    Ok(())
}
