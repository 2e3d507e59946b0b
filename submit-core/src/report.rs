//! Structured progress events
//!
//! The collector and archive writer never print anything themselves. They
//! describe what they are doing through [`Event`]s handed to a [`Reporter`]
//! supplied by the caller, which decides how (or whether) to render them.

use std::path::PathBuf;

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A pattern is about to be resolved
    PatternStarted { pattern: String },
    /// One more filesystem entry was seen while resolving a pattern
    EntryMatched { pattern: String, seen: usize },
    /// The pattern is not valid glob syntax; it will match nothing
    PatternInvalid { pattern: String, reason: String },
    /// An entry could not be read and was left out
    EntrySkipped { path: PathBuf, reason: String },
    /// A pattern finished resolving
    PatternFinished {
        pattern: String,
        /// Existing entries matched by the raw glob
        entries: usize,
        /// Distinct files contributed after directory expansion
        files: usize,
    },
    /// All patterns resolved
    Collected { files: usize, missing: usize },
    /// Archive writing is starting
    ArchiveStarted { output: PathBuf, total: usize },
    /// One entry has been written
    EntryWritten {
        name: String,
        current: usize,
        total: usize,
    },
    /// The archive is in place at its final path
    ArchiveFinished { output: PathBuf, size: u64 },
    /// The finished archive is larger than the configured ceiling
    SizeLimitExceeded { size: u64, limit: u64 },
}

/// Receiver of progress events
pub trait Reporter {
    /// Handle a single event
    fn report(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Reporter for F {
    fn report(&mut self, event: &Event) {
        self(event)
    }
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &Event) {}
}

/// Reporter that keeps every event it receives
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in the order they were reported
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the log, returning the recorded events
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Reporter for EventLog {
    fn report(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
