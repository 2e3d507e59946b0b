//! Deterministic zip archive writing
//!
//! Entries are planned up front so that every file is known to live under the
//! base directory before a single byte is written. The archive itself is
//! built in a temporary file next to the destination and renamed into place
//! once complete, so a failed run never leaves a truncated archive behind.

use crate::error::{Result, SubmitError};
use crate::report::{Event, Reporter};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Default ceiling on the finished archive size (100 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// Permissions stored on every entry
const ENTRY_PERMISSIONS: u32 = 0o644;

/// Archive writing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Size above which the archive is flagged as too large
    pub max_size: u64,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// A single file scheduled for the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File to read from
    pub source: PathBuf,
    /// Name inside the archive, `/`-separated and relative to the base
    pub name: String,
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
    /// Size of the archive on disk, in bytes
    pub size: u64,
    /// Whether `size` exceeds the configured ceiling
    pub over_limit: bool,
}

/// Archive entry name for `path` relative to `base`
///
/// Fails with [`SubmitError::PathEscape`] when `path` is not below `base`.
pub fn entry_name(base: &Path, path: &Path) -> Result<String> {
    let escape = || SubmitError::PathEscape {
        path: path.to_path_buf(),
        base: base.to_path_buf(),
    };

    let relative = path.strip_prefix(base).map_err(|_| escape())?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => return Err(escape()),
        }
    }
    if parts.is_empty() {
        return Err(escape());
    }

    Ok(parts.join("/"))
}

/// Map every file to its archive entry, sorted by entry name
pub fn plan_entries<'a, I>(base: &Path, files: I) -> Result<Vec<ArchiveEntry>>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let base = fs::canonicalize(base).map_err(|e| SubmitError::io(base, e))?;

    let mut names = BTreeSet::new();
    let mut entries = Vec::new();
    for source in files {
        let name = entry_name(&base, source)?;
        if !names.insert(name.clone()) {
            return Err(SubmitError::EntryCollision { name });
        }
        entries.push(ArchiveEntry {
            source: source.clone(),
            name,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Write `files` into a fresh deflate archive at `output`
///
/// Any existing file at `output` is replaced only once the new archive is
/// complete. Entries carry a fixed timestamp so identical inputs produce
/// byte-identical archives.
pub fn write_archive<'a, I>(
    output: &Path,
    base: &Path,
    files: I,
    options: &ArchiveOptions,
    reporter: &mut dyn Reporter,
) -> Result<ArchiveSummary>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let entries = plan_entries(base, files)?;
    let total = entries.len();

    reporter.report(&Event::ArchiveStarted {
        output: output.to_path_buf(),
        total,
    });

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir).map_err(|e| SubmitError::io(dir, e))?;

    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut zip = ZipWriter::new(temp);
    for (index, entry) in entries.iter().enumerate() {
        zip.start_file(entry.name.as_str(), file_options)?;
        let mut source =
            File::open(&entry.source).map_err(|e| SubmitError::io(&entry.source, e))?;
        io::copy(&mut source, &mut zip).map_err(|e| SubmitError::io(&entry.source, e))?;

        reporter.report(&Event::EntryWritten {
            name: entry.name.clone(),
            current: index + 1,
            total,
        });
    }
    let temp = zip.finish()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))
            .map_err(|e| SubmitError::io(temp.path(), e))?;
    }

    let file = temp.persist(output).map_err(|e| SubmitError::Persist {
        path: output.to_path_buf(),
        source: e.error,
    })?;
    let size = file
        .metadata()
        .map_err(|e| SubmitError::io(output, e))?
        .len();

    reporter.report(&Event::ArchiveFinished {
        output: output.to_path_buf(),
        size,
    });

    let over_limit = size > options.max_size;
    if over_limit {
        reporter.report(&Event::SizeLimitExceeded {
            size,
            limit: options.max_size,
        });
    }

    Ok(ArchiveSummary {
        path: output.to_path_buf(),
        entries: total,
        size,
        over_limit,
    })
}
