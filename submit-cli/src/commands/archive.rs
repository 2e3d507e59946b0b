//! Archive command implementation

use super::Session;
use crate::error::CliError;
use crate::prompt::Prompter;
use anyhow::{Context, Result};
use indicatif::HumanBytes;
use submit_core::write_archive;

/// Collect the submission and write it to the output archive
pub fn run(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let name = session.output_name();

    if session.output.exists() {
        log::warn!("{name} already exists.");
        if !prompter.confirm("Overwrite?", false)? {
            return Err(CliError::Aborted.into());
        }
    }

    let collection = session.collect()?;

    if collection.has_missing() && !prompter.confirm("Proceed with missing files?", true)? {
        return Err(CliError::Aborted.into());
    }

    log::info!("Creating {name}...");
    let mut reporter = session.reporter();
    let summary = write_archive(
        &session.output,
        &session.base,
        &collection.files,
        &session.options,
        &mut reporter,
    )
    .with_context(|| format!("Failed to create {}", session.output.display()))?;
    drop(reporter);

    log::info!("Created {name} successfully.");
    log::info!("Size:   {}", HumanBytes(summary.size));
    log::info!("Output: {}", summary.path.display());

    Ok(())
}
