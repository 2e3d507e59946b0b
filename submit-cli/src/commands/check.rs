//! Check command implementation

use super::Session;
use crate::error::CliError;
use anyhow::Result;

/// Fail unless every pattern matched at least one file
pub fn run(session: &Session) -> Result<()> {
    let collection = session.collect()?;

    if collection.has_missing() {
        return Err(CliError::MissingPatterns(collection.missing.len()).into());
    }

    log::info!("All patterns matched at least one file.");
    Ok(())
}
