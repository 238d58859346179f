//! Command-line interface definitions for blockmove

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "

License: MIT
Rust Edition: 2024"
);

#[derive(Parser)]
#[command(name = "blockmove")]
#[command(about = "Move a regex-delimited block of text to a new anchor in every file of a folder")]
#[command(long_about = "blockmove cuts the first block matching a source pattern out of every file
in a folder tree and pastes it next to the first match of a destination pattern.

PATTERNS:
  A pattern is either a regular expression or the marker shorthand
  'START ... END', which matches the literal START text, everything after it
  (line breaks included) and the first literal END text that follows.

  The moved block is wrapped in line breaks and inserted right after the
  destination match (or right before it with --before).

SAFETY:
  Files containing any byte above 0x7F are treated as binary and skipped.
  No backups are kept: run it on a folder under version control, and use
  --dry-run to preview.

EXAMPLES:
  blockmove move src -s '/* start block */ ... /* end block */' -t 'insert_here'
  blockmove move src --dry-run               Preview using saved patterns
  blockmove set-source '// BEGIN ... // END' Save a default source pattern
  blockmove set-destination '^// imports$'   Save a default destination
  blockmove config --show                    Show saved settings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
#[command(propagate_version = true)]
struct Cli {
    /// Use a different configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a debug log to ~/.blockmove/blockmove.log
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move the block in every file under a folder
    #[command(long_about = "Move the block in every file under a folder.

Anything not given on the command line is prompted for. Pattern prompts are
pre-filled with the saved defaults; press Enter to accept them.

EXAMPLES:
  blockmove move ./src -s 'BEGIN ... END' -t 'insert_here'
  blockmove move ./src --before --dry-run")]
    Move {
        /// Folder to process (prompted for if omitted)
        #[arg(value_name = "FOLDER")]
        folder: Option<PathBuf>,

        /// Source pattern: regex or 'START ... END'
        #[arg(short = 's', long, value_name = "PATTERN")]
        source: Option<String>,

        /// Destination pattern: regex or 'START ... END'
        #[arg(short = 't', long = "destination", value_name = "PATTERN")]
        destination: Option<String>,

        /// Insert before the destination match instead of after it
        #[arg(long)]
        before: bool,

        /// Insert after the destination match (overrides the config)
        #[arg(long, conflicts_with = "before")]
        after: bool,

        /// Preview the moves without writing any file
        #[arg(short = 'd', long)]
        dry_run: bool,

        /// Don't report skipped files individually
        #[arg(short = 'q', long)]
        quiet: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Context lines shown around each change in dry-run previews
        #[arg(short = 'n', long, value_name = "NUM", default_value_t = 2)]
        context: usize,
    },

    /// Save the default source pattern
    SetSource {
        /// New pattern (prompted for if omitted)
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },

    /// Save the default destination pattern
    SetDestination {
        /// New pattern (prompted for if omitted)
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },

    /// Show configuration
    Config {
        /// Print the effective configuration
        #[arg(long = "show")]
        show: bool,

        /// Print the configuration file path
        #[arg(long = "path")]
        path: bool,
    },
}

/// Anchor choice from the command line; `None` defers to the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorFlag {
    After,
    Before,
}

#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub debug: bool,
    pub action: Action,
}

#[derive(Debug)]
pub enum Action {
    Move {
        folder: Option<PathBuf>,
        source: Option<String>,
        destination: Option<String>,
        anchor: Option<AnchorFlag>,
        dry_run: bool,
        quiet: bool,
        json: bool,
        context: usize,
    },
    SetSource {
        pattern: Option<String>,
    },
    SetDestination {
        pattern: Option<String>,
    },
    Config {
        show: bool,
        path: bool,
    },
}

pub fn parse_args() -> Args {
    from_cli(Cli::parse())
}

pub fn try_parse_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map(from_cli)
}

fn from_cli(cli: Cli) -> Args {
    let action = match cli.command {
        Commands::Move {
            folder,
            source,
            destination,
            before,
            after,
            dry_run,
            quiet,
            json,
            context,
        } => {
            let anchor = if before {
                Some(AnchorFlag::Before)
            } else if after {
                Some(AnchorFlag::After)
            } else {
                None
            };

            Action::Move {
                folder,
                source,
                destination,
                anchor,
                dry_run,
                quiet,
                json,
                context,
            }
        }
        Commands::SetSource { pattern } => Action::SetSource { pattern },
        Commands::SetDestination { pattern } => Action::SetDestination { pattern },
        Commands::Config { show, path } => Action::Config { show, path },
    };

    Args {
        config: cli.config,
        debug: cli.debug,
        action,
    }
}
