//! blockmove: move a regex-delimited block of text inside every file of a folder
//!
//! The library holds the pattern compiler, file enumerator, block relocator and
//! run orchestrator. The binary at src/main.rs wires them to the terminal.

pub mod cli;
pub mod config;
pub mod diff_formatter;
pub mod enumerator;
pub mod error;
pub mod error_helpers;
pub mod host;
pub mod logger;
pub mod orchestrator;
pub mod pattern;
pub mod regex_error;
pub mod relocator;

// Re-export commonly used types for convenience
pub use config::{ConfigStore, FileConfigStore, MemoryConfigStore, SettingKey};
pub use enumerator::list_files;
pub use error::MoveError;
pub use orchestrator::{FileReport, Host, Notice, NoticeLevel, Orchestrator, RunOptions, RunReport};
pub use pattern::{CompiledPattern, PatternSpec, compile};
pub use regex_error::PatternError;
pub use relocator::{FileOutcome, InsertAnchor, Relocator};
