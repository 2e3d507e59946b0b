//! CLI command implementations

use crate::config::CliConfig;
use crate::error::CliError;
use crate::progress::ProgressReporter;
use crate::prompt::{AutoConfirm, Prompter, TerminalPrompter};
use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use submit_core::{
    collect, find_spec_dir, parse_spec, spec_path, ArchiveOptions, Collection, Pattern,
};

pub mod archive;
pub mod check;
pub mod list;

/// Create a submission zip file
#[derive(Debug, Parser)]
#[command(
    name = "submit",
    version,
    about = "Create a submission zip file. By default, tries to archive the nearest \
             directory containing a `.submit` file."
)]
pub struct SubmitArgs {
    /// The directory to archive (e.g. hw1)
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Output zip file path (default: <DIRECTORY>/submit.zip)
    #[arg(value_name = "OUTPUT_PATH")]
    pub output_path: Option<PathBuf>,

    /// Overwrite and proceed without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// List matching files instead of archiving
    #[arg(short, long, conflicts_with = "check")]
    pub list: bool,

    /// Check that every pattern matches at least one file
    #[arg(short, long)]
    pub check: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "SUBMIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Warn when the archive grows beyond this size (MiB)
    #[arg(long, value_name = "MB", env = "SUBMIT_MAX_SIZE_MB")]
    pub max_size_mb: Option<u64>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What a run does with the collected files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Archive,
    List,
    Check,
}

impl SubmitArgs {
    pub fn action(&self) -> Action {
        if self.list {
            Action::List
        } else if self.check {
            Action::Check
        } else {
            Action::Archive
        }
    }

    /// Execute against the real terminal and working directory
    pub fn execute(&self) -> Result<()> {
        let cwd = env::current_dir().context("Failed to determine the working directory")?;
        let mut prompter: Box<dyn Prompter> = if self.force {
            Box::new(AutoConfirm)
        } else {
            Box::new(TerminalPrompter::new())
        };
        let stdout = io::stdout();

        self.run(&cwd, prompter.as_mut(), &mut stdout.lock())
    }

    /// Execute with explicit collaborators
    ///
    /// `out` only ever receives `--list` output.
    pub fn run(&self, cwd: &Path, prompter: &mut dyn Prompter, out: &mut dyn Write) -> Result<()> {
        let config = self.load_config()?;
        let session = Session::open(self, &config, cwd)?;

        match self.action() {
            Action::Archive => archive::run(&session, prompter),
            Action::List => list::run(&session, out),
            Action::Check => check::run(&session),
        }
    }

    fn load_config(&self) -> Result<CliConfig> {
        match &self.config {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                CliConfig::from_file(path)
            }
            None => Ok(CliConfig::default()),
        }
    }

    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };

        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level),
        )
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}[{:^6}]{style:#} {}",
                level_tag(record.level()),
                record.args()
            )
        })
        .try_init();
    }
}

/// Short tag shown in front of every log line
pub fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WARN",
        log::Level::Info => "INFO",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

/// Everything resolved before files are collected
#[derive(Debug)]
pub struct Session {
    /// Absolute base directory
    pub base: PathBuf,
    /// Absolute archive path
    pub output: PathBuf,
    pub patterns: Vec<Pattern>,
    pub options: ArchiveOptions,
    pub quiet: bool,
}

impl Session {
    /// Resolve the base directory and output path, then read the spec
    pub fn open(args: &SubmitArgs, config: &CliConfig, cwd: &Path) -> Result<Self> {
        let base = resolve_base(args.directory.as_deref(), cwd, &config.spec.file_name)?;
        log::info!("Archiving {}", base.display());

        let output = match &args.output_path {
            Some(path) => cwd.join(path),
            None => base.join(&config.archive.default_output),
        };

        let patterns = parse_spec(&spec_path(&base, &config.spec.file_name))?;
        log::debug!("{} patterns: {:?}", patterns.len(), patterns);

        Ok(Self {
            base,
            output,
            patterns,
            options: config.archive_options(args.max_size_mb),
            quiet: args.quiet,
        })
    }

    /// Output file name, for log messages
    pub fn output_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }

    pub fn reporter(&self) -> ProgressReporter {
        ProgressReporter::new(self.quiet)
    }

    /// Collect files for every pattern, failing when nothing matched at all
    ///
    /// The output archive itself is never part of the collection.
    pub fn collect(&self) -> Result<Collection> {
        log::info!("Finding files...");

        let width = self.patterns.iter().map(|p| p.len()).max().unwrap_or(0);
        let mut reporter = self.reporter().with_pattern_width(width);
        let mut collection = collect(&self.base, &self.patterns, &mut reporter);
        drop(reporter);

        if collection.exclude(&self.output) {
            log::debug!("Leaving {} out of the submission", self.output.display());
        }

        let count = collection.len();
        log::info!("Collected {count} file{}", if count == 1 { "" } else { "s" });

        if collection.has_missing() {
            log::warn!("The following patterns did not match any files:");
            for pattern in &collection.missing {
                log::warn!("> {pattern}");
            }
        }

        if collection.is_empty() {
            return Err(CliError::NoFilesCollected.into());
        }
        Ok(collection)
    }
}

/// Pick the directory to archive
///
/// An explicit directory is taken relative to `cwd`; otherwise the nearest
/// ancestor of `cwd` holding a spec file is used.
pub fn resolve_base(directory: Option<&Path>, cwd: &Path, spec_name: &str) -> Result<PathBuf> {
    let base = match directory {
        Some(dir) => {
            let joined = cwd.join(dir);
            fs::canonicalize(&joined).unwrap_or(joined)
        }
        None => find_spec_dir(cwd, spec_name).ok_or_else(|| CliError::SpecNotDiscovered {
            start: cwd.to_path_buf(),
            file_name: spec_name.to_string(),
        })?,
    };

    if !base.exists() {
        return Err(CliError::DirectoryNotFound(base).into());
    }
    if !base.is_dir() {
        return Err(CliError::NotADirectory(base).into());
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use submit_core::SPEC_FILE_NAME;
    use tempfile::TempDir;

    fn args(argv: &[&str]) -> SubmitArgs {
        SubmitArgs::try_parse_from(std::iter::once("submit").chain(argv.iter().copied())).unwrap()
    }

    fn homework() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let base = fs::canonicalize(temp_dir.path()).unwrap().join("hw1");
        for rel in ["src/a.py", "src/sub/b.py", "README.md", "notes.txt"] {
            let path = base.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, rel).unwrap();
        }
        fs::write(
            base.join(SPEC_FILE_NAME),
            "# sources\nsrc/**/*.py\nREADME.md # docs\n",
        )
        .unwrap();
        (temp_dir, base)
    }

    #[test]
    fn test_action_selection() {
        assert_eq!(args(&[]).action(), Action::Archive);
        assert_eq!(args(&["-l"]).action(), Action::List);
        assert_eq!(args(&["--check"]).action(), Action::Check);
    }

    #[test]
    fn test_list_and_check_conflict() {
        let result = SubmitArgs::try_parse_from(["submit", "--list", "--check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_positionals() {
        let parsed = args(&["hw1", "out.zip", "-f"]);
        assert_eq!(parsed.directory, Some(PathBuf::from("hw1")));
        assert_eq!(parsed.output_path, Some(PathBuf::from("out.zip")));
        assert!(parsed.force);
    }

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(log::Level::Error), "ERR");
        assert_eq!(level_tag(log::Level::Info), "INFO");
        assert_eq!(format!("[{:^6}]", level_tag(log::Level::Warn)), "[ WARN ]");
    }

    #[test]
    fn test_resolve_base_discovers_spec() {
        let (_guard, base) = homework();
        let nested = base.join("src/sub");

        assert_eq!(resolve_base(None, &nested, SPEC_FILE_NAME).unwrap(), base);
    }

    #[test]
    fn test_resolve_base_relative_directory() {
        let (_guard, base) = homework();
        let parent = base.parent().unwrap();

        let resolved = resolve_base(Some(Path::new("hw1")), parent, SPEC_FILE_NAME).unwrap();
        assert_eq!(resolved, base);
    }

    #[test]
    fn test_resolve_base_errors() {
        let (_guard, base) = homework();

        let err = resolve_base(Some(Path::new("nope")), &base, SPEC_FILE_NAME).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::DirectoryNotFound(_))
        ));

        let err = resolve_base(Some(Path::new("README.md")), &base, SPEC_FILE_NAME).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_session_defaults() {
        let (_guard, base) = homework();
        let session = Session::open(&args(&[]), &CliConfig::default(), &base).unwrap();

        assert_eq!(session.base, base);
        assert_eq!(session.output, base.join("submit.zip"));
        assert_eq!(session.output_name(), "submit.zip");
        assert_eq!(session.patterns, vec!["src/**/*.py", "README.md"]);
    }

    #[test]
    fn test_session_missing_spec() {
        let (_guard, base) = homework();
        fs::remove_file(base.join(SPEC_FILE_NAME)).unwrap();

        let err = Session::open(&args(&["."]), &CliConfig::default(), &base).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<submit_core::SubmitError>(),
            Some(submit_core::SubmitError::SpecNotFound { .. })
        ));
    }

    #[test]
    fn test_run_list_writes_sorted_relative_paths() {
        let (_guard, base) = homework();
        let mut out = Vec::new();

        args(&["--list"])
            .run(&base, &mut ScriptedPrompter::default(), &mut out)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "README.md\nsrc/a.py\nsrc/sub/b.py\n"
        );
    }

    #[test]
    fn test_run_archive_declined_overwrite() {
        let (_guard, base) = homework();
        fs::write(base.join("submit.zip"), "previous").unwrap();
        let mut prompter = ScriptedPrompter::new([false]);

        let err = args(&[])
            .run(&base, &mut prompter, &mut io::sink())
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Aborted)));
        assert_eq!(prompter.asked(), ["Overwrite?"]);
        assert_eq!(fs::read_to_string(base.join("submit.zip")).unwrap(), "previous");
    }

    #[test]
    fn test_run_archive_declined_missing() {
        let (_guard, base) = homework();
        fs::write(base.join(SPEC_FILE_NAME), "README.md\nmissing/*.txt\n").unwrap();
        let mut prompter = ScriptedPrompter::new([false]);

        let err = args(&[])
            .run(&base, &mut prompter, &mut io::sink())
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Aborted)));
        assert_eq!(prompter.asked(), ["Proceed with missing files?"]);
        assert!(!base.join("submit.zip").exists());
    }

    #[test]
    fn test_run_list_excludes_previous_output() {
        let (_guard, base) = homework();
        fs::write(base.join(SPEC_FILE_NAME), "*\n").unwrap();
        fs::write(base.join("submit.zip"), "previous").unwrap();

        let mut out = Vec::new();
        args(&["--list"])
            .run(&base, &mut ScriptedPrompter::default(), &mut out)
            .unwrap();

        let listing = String::from_utf8(out).unwrap();
        assert!(!listing.contains("submit.zip"));
        assert!(listing.contains("notes.txt"));
    }

    #[test]
    fn test_run_check_reports_missing() {
        let (_guard, base) = homework();
        fs::write(base.join(SPEC_FILE_NAME), "README.md\nmissing/*.txt\n").unwrap();

        let err = args(&["-c"])
            .run(&base, &mut ScriptedPrompter::default(), &mut io::sink())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingPatterns(1))
        ));
    }

    #[test]
    fn test_run_empty_collection_fails() {
        let (_guard, base) = homework();
        fs::write(base.join(SPEC_FILE_NAME), "# nothing yet\n").unwrap();

        let err = args(&["-c"])
            .run(&base, &mut ScriptedPrompter::default(), &mut io::sink())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NoFilesCollected)
        ));
    }
}
