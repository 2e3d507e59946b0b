//! File collection and archiving for homework submissions
//!
//! A submission directory carries a `.submit` spec file listing glob
//! patterns. This crate turns such a spec into a deterministic zip archive:
//!
//! - [`spec`]: parse the spec file and locate it from a working directory
//! - [`collector`]: resolve patterns (with recursive directory expansion)
//!   into a deduplicated set of canonical file paths
//! - [`archive`]: write those files into a deflate archive, relative to the
//!   base directory, atomically and in sorted order
//! - [`report`]: structured progress events; the crate itself never prints
//!
//! # Example
//!
//! ```no_run
//! use submit_core::{collect, parse_spec, spec_path, write_archive};
//! use submit_core::{ArchiveOptions, NullReporter, SPEC_FILE_NAME};
//! use std::path::Path;
//!
//! let base = Path::new("hw1");
//! let patterns = parse_spec(&spec_path(base, SPEC_FILE_NAME))?;
//! let collection = collect(base, &patterns, &mut NullReporter);
//!
//! for pattern in &collection.missing {
//!     eprintln!("no match: {pattern}");
//! }
//!
//! let summary = write_archive(
//!     &base.join("submit.zip"),
//!     base,
//!     &collection.files,
//!     &ArchiveOptions::default(),
//!     &mut NullReporter,
//! )?;
//! println!("{} bytes", summary.size);
//! # Ok::<(), submit_core::SubmitError>(())
//! ```

pub mod archive;
pub mod collector;
pub mod error;
pub mod report;
pub mod spec;

pub use archive::{
    entry_name, plan_entries, write_archive, ArchiveEntry, ArchiveOptions, ArchiveSummary,
    DEFAULT_MAX_SIZE,
};
pub use collector::{collect, normalize_pattern, Collection, PatternReport};
pub use error::{Result, SubmitError};
pub use report::{Event, EventLog, NullReporter, Reporter};
pub use spec::{find_spec_dir, parse_spec, parse_spec_str, spec_path, Pattern, SPEC_FILE_NAME};
