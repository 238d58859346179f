//! Text output for run reports and dry-run diffs

use crate::orchestrator::{FileReport, RunReport};
use crate::relocator::{FileOutcome, TextChange};
use colored::*;
use similar::{ChangeTag, TextDiff};
use std::io::IsTerminal;

pub struct DiffFormatter;

impl DiffFormatter {
    /// Auto-detect if we should use colors
    pub fn should_use_color() -> bool {
        // Check NO_COLOR env var (https://no-color.org/)
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        std::io::stdout().is_terminal()
    }

    /// One line per file plus a closing tally
    pub fn format_report(report: &RunReport, use_color: bool) -> String {
        let mut output = String::new();

        if report.dry_run {
            let header = format!(
                "Dry run: '{}' -> '{}' in {}\n",
                report.source,
                report.destination,
                report.root.display()
            );
            if use_color {
                output.push_str(&format!("{}\n", header.trim_end().bold()));
            } else {
                output.push_str(&header);
            }
        }

        for file in &report.files {
            output.push_str(&Self::format_file_line(file, use_color));
        }

        let relocated = report.relocated();
        let skipped = report.skipped();
        if use_color {
            output.push_str(&format!(
                "\nTotal: {} file{} ({} {}, {} {})\n",
                report.files.len().to_string().bold().white(),
                if report.files.len() == 1 { "" } else { "s" },
                relocated,
                if report.dry_run { "to move".green() } else { "moved".green() },
                skipped,
                "skipped".yellow()
            ));
        } else {
            output.push_str(&format!(
                "\nTotal: {} files ({} {}, {} skipped)\n",
                report.files.len(),
                relocated,
                if report.dry_run { "to move" } else { "moved" },
                skipped
            ));
        }

        output
    }

    fn format_file_line(file: &FileReport, use_color: bool) -> String {
        let path = file.path.display().to_string();
        let detail = file.outcome.describe();

        let indicator = match file.outcome {
            FileOutcome::Relocated { .. } => "~",
            FileOutcome::Failed { .. } => "!",
            _ => "=",
        };

        if !use_color {
            return format!("{} {} ({})\n", indicator, path, detail);
        }

        match file.outcome {
            FileOutcome::Relocated { .. } => format!(
                "{} {} {}\n",
                indicator.green().bold(),
                path.bold().cyan(),
                detail.green()
            ),
            FileOutcome::Failed { .. } => format!(
                "{} {} {}\n",
                indicator.red().bold(),
                path.bold(),
                detail.red()
            ),
            _ => format!(
                "{} {} {}\n",
                indicator.dimmed(),
                path.dimmed(),
                detail.dimmed()
            ),
        }
    }

    /// Line diff of one relocation with `context_size` unchanged lines around each hunk
    pub fn format_change(path: &str, change: &TextChange, context_size: usize, use_color: bool) -> String {
        let mut output = String::new();

        if use_color {
            output.push_str(&format!("{}\n", path.bold().cyan()));
        } else {
            output.push_str(&format!("{}\n", path));
        }

        let diff = TextDiff::from_lines(&change.before, &change.after);
        for (idx, group) in diff.grouped_ops(context_size).iter().enumerate() {
            if idx > 0 {
                if use_color {
                    output.push_str(&format!("{}\n", "...".dimmed()));
                } else {
                    output.push_str("...\n");
                }
            }

            for op in group {
                for line in diff.iter_changes(op) {
                    let (indicator, line_num) = match line.tag() {
                        ChangeTag::Equal => ("=", line.new_index()),
                        ChangeTag::Insert => ("+", line.new_index()),
                        ChangeTag::Delete => ("-", line.old_index()),
                    };
                    let line_num = line_num.map(|n| n + 1).unwrap_or(0);
                    let content = line.value().trim_end_matches('\n');

                    if use_color {
                        let colored_line = match line.tag() {
                            ChangeTag::Equal => format!("L{}: {} {}\n", line_num, indicator.dimmed(), content.dimmed()),
                            ChangeTag::Insert => format!("L{}: {} {}\n", line_num, indicator.green().bold(), content.green().bold()),
                            ChangeTag::Delete => format!("L{}: {} {}\n", line_num, indicator.red().bold(), content.red()),
                        };
                        output.push_str(&colored_line);
                    } else {
                        output.push_str(&format!("L{}: {} {}\n", line_num, indicator, content));
                    }
                }
            }
        }

        output
    }
}
