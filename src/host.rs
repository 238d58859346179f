//! Terminal implementation of `Host`
//!
//! Values given on the command line are used as-is; anything missing is asked
//! for on stdin. Notifications go to stderr.

use crate::orchestrator::{Host, Notice, NoticeLevel};
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub struct TerminalHost<R: BufRead, W: Write> {
    folder: Option<PathBuf>,
    answers: Vec<Option<String>>,
    input: R,
    output: W,
    use_color: bool,
}

impl TerminalHost<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio(use_color: bool) -> Self {
        Self::new(io::stdin().lock(), io::stderr(), use_color)
    }
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W, use_color: bool) -> Self {
        Self {
            folder: None,
            answers: Vec::new(),
            input,
            output,
            use_color,
        }
    }

    /// Folder given on the command line; skips the folder prompt
    pub fn with_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.folder = folder;
        self
    }

    /// Answers given on the command line, consumed by prompts in order
    ///
    /// A `None` entry still prompts interactively.
    pub fn with_answers(mut self, answers: Vec<Option<String>>) -> Self {
        self.answers = answers;
        self.answers.reverse();
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, message: &str) -> Option<String> {
        let _ = write!(self.output, "{}", message);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Host for TerminalHost<R, W> {
    fn choose_folder(&mut self) -> Option<PathBuf> {
        if let Some(folder) = self.folder.take() {
            return Some(folder);
        }

        self.read_line("Select folder: ")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    fn prompt(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        if let Some(Some(answer)) = self.answers.pop() {
            return Some(answer);
        }

        let question = match default {
            Some(default) => format!("{} [{}]: ", message, default),
            None => format!("{}: ", message),
        };
        let line = self.read_line(&question)?;

        // an empty answer keeps the pre-filled value
        if line.is_empty() {
            default.map(str::to_string)
        } else {
            Some(line)
        }
    }

    fn notify(&mut self, notice: Notice) {
        let line = if self.use_color {
            match notice.level {
                NoticeLevel::Info => format!("{} {}", "✓".green().bold(), notice.message),
                NoticeLevel::Warning => format!("{} {}", "⚠".yellow().bold(), notice.message.yellow()),
                NoticeLevel::Error => format!("{} {}", "✗".red().bold(), notice.message.red()),
            }
        } else {
            let tag = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            format!("{}: {}", tag, notice.message)
        };
        let _ = writeln!(self.output, "{}", line);
    }
}
