//! Pattern resolution against the filesystem
//!
//! Each pattern is globbed relative to the base directory. Matched files are
//! taken as-is, matched directories contribute every regular file beneath
//! them. Results from all patterns are merged into one set of canonical paths.

use crate::report::{Event, Reporter};
use crate::spec::Pattern;
use glob::{glob_with, MatchOptions};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `*` and `?` stay within one path component and never match a leading dot
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Outcome of resolving a single pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternReport {
    pub pattern: Pattern,
    /// Existing entries matched by the glob itself
    pub entries: usize,
    /// Distinct files contributed after directory expansion
    pub files: usize,
}

impl PatternReport {
    /// Whether the glob matched nothing at all
    pub fn is_missing(&self) -> bool {
        self.entries == 0
    }
}

/// Files gathered from all patterns of a spec
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Canonical paths of every collected regular file
    pub files: BTreeSet<PathBuf>,
    /// Patterns that matched nothing, in spec order
    pub missing: Vec<Pattern>,
    /// Per-pattern results, in spec order
    pub reports: Vec<PatternReport>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Drop `path` from the collected files, returning whether it was present
    ///
    /// The path is canonicalized first when it exists, so callers can pass
    /// the path as the user typed it.
    pub fn exclude(&mut self, path: &Path) -> bool {
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.files.remove(&path)
    }
}

/// Resolve every pattern against `base` and merge the results
pub fn collect(base: &Path, patterns: &[Pattern], reporter: &mut dyn Reporter) -> Collection {
    let mut collection = Collection::default();

    for pattern in patterns {
        let mut matched = BTreeSet::new();
        let report = resolve_pattern(base, pattern, &mut matched, reporter);

        if report.is_missing() {
            collection.missing.push(pattern.clone());
        }
        collection.files.extend(matched);
        collection.reports.push(report);
    }

    reporter.report(&Event::Collected {
        files: collection.files.len(),
        missing: collection.missing.len(),
    });

    collection
}

/// Glob expression for `pattern` anchored at `base`
///
/// Metacharacters in the base path are escaped so only the pattern part is
/// interpreted. Absolute patterns are used verbatim apart from the `**`
/// rewriting done by [`normalize_pattern`].
pub fn anchored_glob(base: &Path, pattern: &str) -> String {
    let pattern = normalize_pattern(pattern);
    if Path::new(&pattern).is_absolute() {
        return pattern;
    }
    let escaped = glob::Pattern::escape(&base.to_string_lossy());
    Path::new(&escaped)
        .join(&pattern)
        .to_string_lossy()
        .into_owned()
}

/// Rewrite `**` into forms the glob matcher resolves the expected way
///
/// - A trailing `**` component matches its parent directory, which is then
///   expanded in full: `src/**` behaves like `src`. A lone `**` becomes `*`.
/// - `**` that is not a whole component acts like `*`: `src/**.py` behaves
///   like `src/*.py`.
pub fn normalize_pattern(pattern: &str) -> String {
    let mut parts: Vec<String> = pattern
        .split('/')
        .map(|part| {
            if part == "**" {
                part.to_string()
            } else {
                collapse_stars(part)
            }
        })
        .collect();

    while parts.len() > 1 && parts.last().is_some_and(|p| p == "**") {
        // "/**" keeps its root
        if parts.len() == 2 && parts[0].is_empty() {
            break;
        }
        parts.pop();
    }
    // Only "**" and "/**" can still end in a recursive component here
    if let Some(last) = parts.last_mut().filter(|p| p.as_str() == "**") {
        *last = "*".to_string();
    }

    parts.join("/")
}

/// Collapse runs of `*` inside a component into a single `*`
fn collapse_stars(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

fn resolve_pattern(
    base: &Path,
    pattern: &str,
    matched: &mut BTreeSet<PathBuf>,
    reporter: &mut dyn Reporter,
) -> PatternReport {
    reporter.report(&Event::PatternStarted {
        pattern: pattern.to_string(),
    });

    let mut tracker = Tracker {
        pattern,
        seen: 0,
        reporter,
    };
    let mut entries = 0;

    match glob_with(&anchored_glob(base, pattern), MATCH_OPTIONS) {
        Ok(paths) => {
            for path_result in paths {
                let path = match path_result {
                    Ok(path) => path,
                    Err(e) => {
                        tracker.skipped(e.path(), e.error().to_string());
                        continue;
                    }
                };

                // Follows symlinks, so a dangling link lands in the error arm
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => {
                        entries += 1;
                        tracker.tick();
                        tracker.add_file(&path, matched);
                    }
                    Ok(meta) if meta.is_dir() => {
                        entries += 1;
                        tracker.tick();
                        expand_dir(&path, matched, &mut tracker);
                    }
                    Ok(_) => tracker.skipped(&path, "not a regular file".to_string()),
                    Err(e) => tracker.skipped(&path, e.to_string()),
                }
            }
        }
        Err(e) => tracker.reporter.report(&Event::PatternInvalid {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }),
    }

    let report = PatternReport {
        pattern: pattern.to_string(),
        entries,
        files: matched.len(),
    };
    tracker.reporter.report(&Event::PatternFinished {
        pattern: report.pattern.clone(),
        entries: report.entries,
        files: report.files,
    });
    report
}

/// Add every regular file below `dir`
///
/// Symlinked directories are not descended into; symlinked files are kept.
fn expand_dir(dir: &Path, matched: &mut BTreeSet<PathBuf>, tracker: &mut Tracker<'_, '_>) {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                tracker.skipped(&path, e.to_string());
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => {
                tracker.tick();
                tracker.add_file(entry.path(), matched);
            }
            Ok(_) => {}
            Err(e) => tracker.skipped(entry.path(), e.to_string()),
        }
    }
}

/// Per-pattern bookkeeping for progress events
struct Tracker<'a, 'r> {
    pattern: &'a str,
    seen: usize,
    reporter: &'r mut dyn Reporter,
}

impl Tracker<'_, '_> {
    fn tick(&mut self) {
        self.seen += 1;
        self.reporter.report(&Event::EntryMatched {
            pattern: self.pattern.to_string(),
            seen: self.seen,
        });
    }

    fn skipped(&mut self, path: &Path, reason: String) {
        self.reporter.report(&Event::EntrySkipped {
            path: path.to_path_buf(),
            reason,
        });
    }

    fn add_file(&mut self, path: &Path, matched: &mut BTreeSet<PathBuf>) {
        match fs::canonicalize(path) {
            Ok(canonical) => {
                matched.insert(canonical);
            }
            Err(e) => self.skipped(path, e.to_string()),
        }
    }
}
