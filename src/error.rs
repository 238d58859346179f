//! Errors that end a run before or during enumeration

use crate::regex_error::PatternError;
use std::path::PathBuf;

/// Run-level failures; reported once and no file is touched
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// No folder was chosen
    #[error("No folder selected.")]
    UserCancelled,

    /// A required pattern was left empty or the prompt was dismissed
    #[error("{what} is required")]
    MissingInput { what: &'static str },

    /// A pattern failed to compile
    #[error("{0}")]
    Pattern(#[from] PatternError),

    /// The root directory could not be enumerated
    #[error("{message}")]
    Io { path: PathBuf, message: String },

    /// Enumeration found nothing to process
    #[error("No files found in the selected folder: {}", root.display())]
    NoFilesFound { root: PathBuf },

    /// Settings could not be read or written
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MoveError {
    /// Stable tag for logs and machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::UserCancelled => "UserCancelled",
            MoveError::MissingInput { .. } => "MissingInput",
            MoveError::Pattern(_) => "PatternError",
            MoveError::Io { .. } => "IOError",
            MoveError::NoFilesFound { .. } => "NoFilesFound",
            MoveError::Config(_) => "ConfigError",
        }
    }
}

pub type Result<T> = std::result::Result<T, MoveError>;
