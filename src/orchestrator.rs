//! End-to-end run: folder, patterns, enumeration, per-file relocation
//!
//! Everything interactive goes through a `Host`, and saved patterns through a
//! `ConfigStore`, so a run can be driven from the terminal or from tests alike.

use crate::config::{ConfigStore, SettingKey};
use crate::enumerator::list_files;
use crate::error::{MoveError, Result};
use crate::pattern::compile;
use crate::relocator::{FileOutcome, InsertAnchor, Relocation, Relocator, TextChange};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const SOURCE_PROMPT: &str = "Enter the regex to select the code block";
const DESTINATION_PROMPT: &str = "Enter the regex to find the destination line";
const SOURCE_PLACEHOLDER: &str = "/* start block */ ... /* end block */";
const DESTINATION_PLACEHOLDER: &str = "insert_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The environment a run talks to
pub trait Host {
    /// Ask for the folder to process; `None` when the user cancels
    fn choose_folder(&mut self) -> Option<PathBuf>;

    /// Ask for a string, pre-filled with `default`; `None` when cancelled
    fn prompt(&mut self, message: &str, default: Option<&str>) -> Option<String>;

    /// Show a non-blocking message
    fn notify(&mut self, notice: Notice);
}

/// Run lifecycle, traced at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    AwaitingFolder,
    AwaitingSourcePattern,
    AwaitingDestinationPattern,
    Compiling,
    Enumerating,
    ProcessingFiles(usize),
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::ProcessingFiles(n) => write!(f, "ProcessingFiles({})", n),
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub anchor: InsertAnchor,
    pub dry_run: bool,
    /// Notify about each skipped file, not just log it
    pub report_skipped: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            anchor: InsertAnchor::After,
            dry_run: false,
            report_skipped: true,
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
    #[serde(skip)]
    pub change: Option<TextChange>,
}

/// Ordered per-file outcomes of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub source: String,
    pub destination: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn relocated(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_relocated()).count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.relocated()
    }

    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.path == path).map(|f| &f.outcome)
    }

    fn summary(&self) -> String {
        let verb = if self.dry_run { "would be moved" } else { "moved" };
        format!(
            "Code blocks {} successfully: {} of {} files relocated, {} skipped.",
            verb,
            self.relocated(),
            self.files.len(),
            self.skipped()
        )
    }
}

pub struct Orchestrator<'a, H: Host, S: ConfigStore> {
    host: &'a mut H,
    store: &'a mut S,
    options: RunOptions,
    state: RunState,
}

impl<'a, H: Host, S: ConfigStore> Orchestrator<'a, H, S> {
    pub fn new(host: &'a mut H, store: &'a mut S) -> Self {
        Self {
            host,
            store,
            options: RunOptions::default(),
            state: RunState::Idle,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Move the block in every file under the chosen folder
    ///
    /// Fatal errors are reported to the host once and returned; per-file problems
    /// are collected into the report and never stop the loop.
    pub fn run(&mut self) -> Result<RunReport> {
        let result = self.run_inner();
        self.transition(RunState::Done);

        match result {
            Ok(report) => {
                self.host.notify(Notice::info(report.summary()));
                Ok(report)
            }
            Err(err) => {
                warn!(kind = err.kind(), "run aborted");
                self.host.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn run_inner(&mut self) -> Result<RunReport> {
        self.transition(RunState::AwaitingFolder);
        let root = self.host.choose_folder().ok_or(MoveError::UserCancelled)?;

        self.transition(RunState::AwaitingSourcePattern);
        let source_spec = self.ask_pattern(
            SettingKey::SourceRegex,
            SOURCE_PROMPT,
            "Source regex pattern",
        )?;

        self.transition(RunState::AwaitingDestinationPattern);
        let destination_spec = self.ask_pattern(
            SettingKey::DestinationRegex,
            DESTINATION_PROMPT,
            "Destination regex pattern",
        )?;

        self.transition(RunState::Compiling);
        let source = compile(&source_spec)?;
        let destination = compile(&destination_spec)?;
        let relocator = Relocator::new(source, destination)
            .with_anchor(self.options.anchor)
            .with_dry_run(self.options.dry_run);

        self.transition(RunState::Enumerating);
        let paths = list_files(&root)?;
        if paths.is_empty() {
            return Err(MoveError::NoFilesFound { root });
        }

        self.transition(RunState::ProcessingFiles(paths.len()));
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let result = relocator.relocate(&path);
            files.push(self.settle(path, result));
        }

        info!(
            root = %root.display(),
            files = files.len(),
            relocated = files.iter().filter(|f| f.outcome.is_relocated()).count(),
            "run complete"
        );

        Ok(RunReport {
            root,
            source: source_spec,
            destination: destination_spec,
            dry_run: self.options.dry_run,
            files,
        })
    }

    fn ask_pattern(
        &mut self,
        key: SettingKey,
        message: &str,
        what: &'static str,
    ) -> Result<String> {
        let default = self.store.get(key).filter(|v| !v.is_empty());
        self.host
            .prompt(message, default.as_deref())
            .filter(|v| !v.is_empty())
            .ok_or(MoveError::MissingInput { what })
    }

    /// Turn one relocation attempt into a report entry and tell the host about it;
    /// an I/O error becomes a `Failed` outcome rather than ending the run
    fn settle(&mut self, path: PathBuf, result: anyhow::Result<Relocation>) -> FileReport {
        let report = match result {
            Ok(relocation) => FileReport {
                path,
                outcome: relocation.outcome,
                change: relocation.change,
            },
            Err(e) => FileReport {
                path,
                outcome: FileOutcome::Failed {
                    message: format!("{:#}", e),
                },
                change: None,
            },
        };
        self.report_file(&report);
        report
    }

    fn report_file(&mut self, report: &FileReport) {
        let path = report.path.display();
        match &report.outcome {
            FileOutcome::Relocated { .. } => {
                debug!(file = %path, outcome = %report.outcome.describe(), "file done");
            }
            FileOutcome::Failed { message } => {
                warn!(file = %path, error = %message, "file failed");
                self.host.notify(Notice::error(message.clone()));
            }
            skipped => {
                warn!(file = %path, outcome = skipped.label(), "file skipped");
                if self.options.report_skipped {
                    self.host.notify(Notice::warning(format!(
                        "{}: {}",
                        skipped.describe(),
                        path
                    )));
                }
            }
        }
    }

    /// Prompt for and save a new default source pattern
    pub fn set_source_pattern(&mut self) -> Result<String> {
        self.set_pattern(
            SettingKey::SourceRegex,
            SOURCE_PROMPT,
            SOURCE_PLACEHOLDER,
            "Source regex",
        )
    }

    /// Prompt for and save a new default destination pattern
    pub fn set_destination_pattern(&mut self) -> Result<String> {
        self.set_pattern(
            SettingKey::DestinationRegex,
            DESTINATION_PROMPT,
            DESTINATION_PLACEHOLDER,
            "Destination regex",
        )
    }

    fn set_pattern(
        &mut self,
        key: SettingKey,
        message: &str,
        placeholder: &str,
        what: &'static str,
    ) -> Result<String> {
        let value = self
            .host
            .prompt(&format!("{} (e.g. {})", message, placeholder), None)
            .filter(|v| !v.is_empty())
            .ok_or(MoveError::MissingInput { what });

        let saved = value.and_then(|value| {
            self.store.set(key, &value)?;
            Ok(value)
        });

        match &saved {
            Ok(value) => {
                info!(key = key.name(), value = %value, "saved pattern");
                self.host
                    .notify(Notice::info(format!("{} updated successfully!", what)));
            }
            Err(err) => self.host.notify(Notice::error(err.to_string())),
        }
        saved
    }
}
