//! Progress reporting module

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;
use submit_core::{Event, Reporter};

/// Renders core events as spinners, bars and log lines on stderr
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
    pattern_width: usize,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
            pattern_width: 0,
        }
    }

    /// Pad pattern names to this width in per-pattern summary lines
    pub fn with_pattern_width(mut self, width: usize) -> Self {
        self.pattern_width = width;
        self
    }

    /// Summary line printed once a pattern is resolved
    pub fn pattern_line(&self, pattern: &str, files: usize) -> String {
        let plural = if files == 1 { "" } else { "s" };
        format!(
            "> {pattern:<width$}{files} file{plural}",
            width = self.pattern_width + 3
        )
    }

    fn init_spinner(&mut self, pattern: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("> {msg} {spinner} {pos} entries")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(pattern.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    fn init_files(&mut self, total_files: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_files);
        pb.set_style(
            ProgressStyle::with_template("{bar:32.cyan/blue} {percent:>3}% ({pos}/{len}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░"),
        );

        self.progress_bar = Some(pb);
    }

    fn clear(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Run `f` with any active bar hidden, so log lines don't tear it
    fn suspend<F: FnOnce()>(&self, f: F) {
        match &self.progress_bar {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl Reporter for ProgressReporter {
    fn report(&mut self, event: &Event) {
        match event {
            Event::PatternStarted { pattern } => self.init_spinner(pattern),
            Event::EntryMatched { seen, .. } => {
                if let Some(pb) = &self.progress_bar {
                    pb.set_position(*seen as u64);
                }
            }
            Event::PatternInvalid { pattern, reason } => {
                self.suspend(|| log::warn!("Pattern {pattern} is not a valid glob: {reason}"))
            }
            Event::EntrySkipped { path, reason } => {
                self.suspend(|| log::debug!("Skipping {}: {reason}", path.display()))
            }
            Event::PatternFinished { pattern, files, .. } => {
                self.clear();
                log::info!("{}", self.pattern_line(pattern, *files));
            }
            Event::Collected { .. } => {}
            Event::ArchiveStarted { total, .. } => self.init_files(*total as u64),
            Event::EntryWritten { name, current, .. } => {
                if let Some(pb) = &self.progress_bar {
                    pb.set_message(name.clone());
                    pb.set_position(*current as u64);
                }
                log::trace!("Wrote {name}");
            }
            Event::ArchiveFinished { .. } => self.clear(),
            Event::SizeLimitExceeded { size, limit } => log::warn!(
                "Archive size {} exceeds the limit of {}.",
                HumanBytes(*size),
                HumanBytes(*limit)
            ),
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_line_padding() {
        let reporter = ProgressReporter::new(true).with_pattern_width(8);
        assert_eq!(reporter.pattern_line("*.py", 2), "> *.py       2 files");
        assert_eq!(reporter.pattern_line("src/**", 1), "> src/**     1 file");
    }

    #[test]
    fn test_quiet_reporter_draws_nothing() {
        let mut reporter = ProgressReporter::new(true);
        reporter.report(&Event::PatternStarted {
            pattern: "*.py".to_string(),
        });
        assert!(reporter.progress_bar.is_none());

        reporter.report(&Event::ArchiveStarted {
            output: "submit.zip".into(),
            total: 3,
        });
        assert!(reporter.progress_bar.is_none());
    }

    #[test]
    fn test_bar_lifecycle() {
        let mut reporter = ProgressReporter::new(false);
        reporter.report(&Event::ArchiveStarted {
            output: "submit.zip".into(),
            total: 2,
        });
        reporter.report(&Event::EntryWritten {
            name: "a.txt".to_string(),
            current: 1,
            total: 2,
        });
        assert_eq!(reporter.progress_bar.as_ref().unwrap().position(), 1);

        reporter.report(&Event::ArchiveFinished {
            output: "submit.zip".into(),
            size: 10,
        });
        assert!(reporter.progress_bar.is_none());
    }
}
