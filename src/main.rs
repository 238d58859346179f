use anyhow::{Context, Result};
use blockmove::cli::{self, Action, AnchorFlag, Args};
use blockmove::config::{self, FileConfigStore};
use blockmove::diff_formatter::DiffFormatter;
use blockmove::host::TerminalHost;
use blockmove::logger;
use blockmove::orchestrator::{Orchestrator, RunOptions};
use blockmove::relocator::InsertAnchor;
use std::path::PathBuf;
use std::process;

fn main() -> Result<()> {
    let args = cli::parse_args();

    let mut store = match &args.config {
        Some(path) => FileConfigStore::open(path.clone())?,
        None => FileConfigStore::open_default()?,
    };

    let debug = args.debug || store.config().logging.debug;
    let log_dir = match store.path().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => config::config_dir()?,
    };
    if let Some(log_path) = logger::init_debug_logging(debug, &log_dir)? {
        tracing::debug!(log = %log_path.display(), "debug logging enabled");
    }

    let Args { action, .. } = args;
    match action {
        Action::Move {
            folder,
            source,
            destination,
            anchor,
            dry_run,
            quiet,
            json,
            context,
        } => run_move(&mut store, folder, source, destination, anchor, dry_run, quiet, json, context),
        Action::SetSource { pattern } => set_pattern(&mut store, pattern, true),
        Action::SetDestination { pattern } => set_pattern(&mut store, pattern, false),
        Action::Config { show, path } => show_config(&store, show, path),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_move(
    store: &mut FileConfigStore,
    folder: Option<PathBuf>,
    source: Option<String>,
    destination: Option<String>,
    anchor: Option<AnchorFlag>,
    dry_run: bool,
    quiet: bool,
    json: bool,
    context: usize,
) -> Result<()> {
    let processing = store.config().processing.clone();
    let options = RunOptions {
        anchor: match anchor {
            Some(AnchorFlag::Before) => InsertAnchor::Before,
            Some(AnchorFlag::After) => InsertAnchor::After,
            None => processing.insert_anchor,
        },
        dry_run,
        report_skipped: processing.report_skipped && !quiet,
    };

    let use_color = DiffFormatter::should_use_color();
    let mut host = TerminalHost::stdio(use_color)
        .with_folder(folder)
        .with_answers(vec![source, destination]);

    let report = match Orchestrator::new(&mut host, store).with_options(options).run() {
        Ok(report) => report,
        // already reported through the host
        Err(_) => process::exit(1),
    };

    if json {
        let output = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", output);
        return Ok(());
    }

    if dry_run {
        for file in &report.files {
            if let Some(change) = &file.change {
                let path = file.path.display().to_string();
                print!("{}", DiffFormatter::format_change(&path, change, context, use_color));
                println!();
            }
        }
    }
    print!("{}", DiffFormatter::format_report(&report, use_color));

    Ok(())
}

fn set_pattern(store: &mut FileConfigStore, pattern: Option<String>, source: bool) -> Result<()> {
    let mut host = TerminalHost::stdio(DiffFormatter::should_use_color()).with_answers(vec![pattern]);
    let mut orchestrator = Orchestrator::new(&mut host, store);

    let result = if source {
        orchestrator.set_source_pattern()
    } else {
        orchestrator.set_destination_pattern()
    };

    if result.is_err() {
        process::exit(1);
    }
    Ok(())
}

fn show_config(store: &FileConfigStore, show: bool, path: bool) -> Result<()> {
    let show_all = !show && !path;

    if path || show_all {
        println!("{}", store.path().display());
    }

    if show || show_all {
        let body = toml::to_string_pretty(store.config()).context("Failed to serialize config")?;
        println!("{}", body);
    }

    Ok(())
}
