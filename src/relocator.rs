//! Block relocation: cut the first source match and paste it at the destination

use crate::error_helpers::file_error;
use crate::pattern::{BlockMatch, CompiledPattern};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where the moved block goes relative to the destination match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertAnchor {
    /// Right after the end of the destination match
    #[default]
    After,
    /// Right before the start of the destination match
    Before,
}

impl InsertAnchor {
    fn offset(self, destination: &BlockMatch) -> usize {
        match self {
            InsertAnchor::After => destination.end(),
            InsertAnchor::Before => destination.start(),
        }
    }
}

/// Why a file was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Binary,
    NoSourceMatch,
    NoDestinationMatch,
    Overlap,
}

/// Per-file result of a relocation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The block was moved (or would be, in dry-run mode)
    Relocated {
        /// 1-based line where the block started
        source_line: usize,
        /// 1-based line of the destination anchor in the original text
        destination_line: usize,
        /// Size of the moved block in bytes
        block_bytes: usize,
    },
    /// The file contains bytes outside 7-bit ASCII
    SkippedBinary,
    NoSourceMatch,
    NoDestinationMatch,
    /// The destination lies inside the block being moved
    Overlap,
    /// The file could not be read or written
    Failed { message: String },
}

impl FileOutcome {
    pub fn is_relocated(&self) -> bool {
        matches!(self, FileOutcome::Relocated { .. })
    }

    /// Stable tag for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            FileOutcome::Relocated { .. } => "Relocated",
            FileOutcome::SkippedBinary => "SkippedBinary",
            FileOutcome::NoSourceMatch => "NoSourceMatch",
            FileOutcome::NoDestinationMatch => "NoDestinationMatch",
            FileOutcome::Overlap => "Overlap",
            FileOutcome::Failed { .. } => "IOError",
        }
    }

    /// Human readable reason for anything but a relocation
    pub fn describe(&self) -> String {
        match self {
            FileOutcome::Relocated {
                source_line,
                destination_line,
                block_bytes,
            } => format!(
                "moved {} bytes from line {} to line {}",
                block_bytes, source_line, destination_line
            ),
            FileOutcome::SkippedBinary => "skipped binary file".to_string(),
            FileOutcome::NoSourceMatch => "no code block matched the source pattern".to_string(),
            FileOutcome::NoDestinationMatch => {
                "no line matched the destination pattern".to_string()
            }
            FileOutcome::Overlap => {
                "destination match overlaps the source block".to_string()
            }
            FileOutcome::Failed { message } => message.clone(),
        }
    }
}

impl From<SkipReason> for FileOutcome {
    fn from(reason: SkipReason) -> Self {
        match reason {
            SkipReason::Binary => FileOutcome::SkippedBinary,
            SkipReason::NoSourceMatch => FileOutcome::NoSourceMatch,
            SkipReason::NoDestinationMatch => FileOutcome::NoDestinationMatch,
            SkipReason::Overlap => FileOutcome::Overlap,
        }
    }
}

/// A planned cut and paste, computed entirely against the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub source: BlockMatch,
    pub destination: BlockMatch,
    /// Offset in the original text where the block is inserted
    pub insert_at: usize,
    /// The full text after the move
    pub output: String,
}

/// Original and rewritten text of a relocated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone)]
pub struct Relocation {
    pub outcome: FileOutcome,
    /// Present only when the block was moved
    pub change: Option<TextChange>,
}

impl Relocation {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            outcome: reason.into(),
            change: None,
        }
    }
}

/// Moves the first source match to the first destination match, one file at a time
pub struct Relocator {
    source: CompiledPattern,
    destination: CompiledPattern,
    anchor: InsertAnchor,
    dry_run: bool,
}

impl Relocator {
    pub fn new(source: CompiledPattern, destination: CompiledPattern) -> Self {
        Self {
            source,
            destination,
            anchor: InsertAnchor::default(),
            dry_run: false,
        }
    }

    pub fn with_anchor(mut self, anchor: InsertAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Compute edits without writing them back
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn anchor(&self) -> InsertAnchor {
        self.anchor
    }

    /// Plan the move for `text` without touching the filesystem
    ///
    /// Both matches are located in the unmodified text, so deleting the block cannot
    /// shift the insertion offset.
    ///
    /// An empty source match counts as `NoSourceMatch`. Accepting it would only
    /// inject a blank `"\n\n"` at the destination, so this deliberately does not
    /// treat a zero-width match as a block.
    pub fn plan(&self, text: &str) -> std::result::Result<Splice, SkipReason> {
        let source = self
            .source
            .find_first(text)
            .filter(|m| !m.is_empty())
            .ok_or(SkipReason::NoSourceMatch)?;
        let destination = self
            .destination
            .find_first(text)
            .ok_or(SkipReason::NoDestinationMatch)?;

        let insert_at = self.anchor.offset(&destination);
        let intersects = source.start() < destination.end() && destination.start() < source.end();
        let inside = source.start() < insert_at && insert_at < source.end();
        if intersects || inside {
            return Err(SkipReason::Overlap);
        }

        let wrapped = format!("\n{}\n", source.text);
        let mut output = String::with_capacity(text.len() + 2);
        if insert_at <= source.start() {
            output.push_str(&text[..insert_at]);
            output.push_str(&wrapped);
            output.push_str(&text[insert_at..source.start()]);
            output.push_str(&text[source.end()..]);
        } else {
            output.push_str(&text[..source.start()]);
            output.push_str(&text[source.end()..insert_at]);
            output.push_str(&wrapped);
            output.push_str(&text[insert_at..]);
        }

        Ok(Splice {
            source,
            destination,
            insert_at,
            output,
        })
    }

    /// Relocate the block inside one file and write the result in place
    ///
    /// Returns `Err` only for I/O failures; unmatched or binary files come back as
    /// a skipped `Relocation` and are left byte-for-byte unchanged.
    pub fn relocate(&self, file_path: &Path) -> Result<Relocation> {
        let bytes = fs::read(file_path).map_err(|e| {
            anyhow::anyhow!("{}", file_error(file_path, "reading", &e))
        })?;

        if is_binary(&bytes) {
            debug!(file = %file_path.display(), "binary content, skipping");
            return Ok(Relocation::skipped(SkipReason::Binary));
        }

        let text = String::from_utf8(bytes)
            .with_context(|| format!("Failed to decode file: {}", file_path.display()))?;

        let splice = match self.plan(&text) {
            Ok(splice) => splice,
            Err(reason) => return Ok(Relocation::skipped(reason)),
        };

        let outcome = FileOutcome::Relocated {
            source_line: line_of(&text, splice.source.start()),
            destination_line: line_of(&text, splice.insert_at),
            block_bytes: splice.source.text.len(),
        };

        if self.dry_run {
            debug!(file = %file_path.display(), "dry run, not writing");
        } else {
            write_in_place(file_path, &splice.output)?;
            info!(file = %file_path.display(), outcome = %outcome.describe(), "relocated block");
        }

        Ok(Relocation {
            outcome,
            change: Some(TextChange {
                before: text,
                after: splice.output,
            }),
        })
    }
}

/// Any byte above 0x7F marks the content as binary
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().any(|b| *b > 127)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Replace the file through a temp file in the same directory, keeping its permissions
fn write_in_place(file_path: &Path, content: &str) -> Result<()> {
    let parent_dir = file_path.parent().unwrap_or(Path::new("."));
    let permissions = fs::metadata(file_path)
        .map_err(|e| anyhow::anyhow!("{}", file_error(file_path, "reading", &e)))?
        .permissions();

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| anyhow::anyhow!("{}", file_error(parent_dir, "creating a temp file in", &e)))?;
    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write temp file")?;
    temp_file
        .flush()
        .with_context(|| "Failed to flush temp file")?;
    fs::set_permissions(temp_file.path(), permissions)
        .with_context(|| format!("Failed to copy permissions of {}", file_path.display()))?;

    temp_file
        .persist(file_path)
        .map_err(|e| anyhow::anyhow!("{}", file_error(file_path, "writing", &e.error)))?;

    Ok(())
}
