//! dupehist - Duplicate File Finder with a Durable Deletion History
//!
//! A cross-platform Rust library and CLI for finding byte-identical files
//! using content fingerprints (SHA-256), deleting operator-selected
//! copies, and keeping an append-only audit record of every deletion
//! batch in an embedded SQLite store.
//!
//! The core pieces compose left to right:
//! - [`scanner`]: deterministic traversal and streaming fingerprints
//! - [`duplicates`]: size + digest grouping into [`DuplicateGroup`]s
//! - [`actions`]: best-effort batch deletion with a text audit log
//! - [`history`]: the durable deletion history

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod history;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

pub use actions::{delete_files, BatchOutcome};
pub use duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig, ScanSummary};
pub use history::{HistoryEntry, HistoryStore};

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands, DeleteArgs, HistoryArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::scanner::WalkerConfig;

/// Run the application logic for a parsed command line.
///
/// Returns the exit code the process should finish with; hard failures
/// (invalid root, unavailable history store, interruption) come back as
/// errors for `main` to classify.
///
/// # Errors
///
/// Propagates scan, deletion-surface, and history-store failures.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let config = Config::load();

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
        Commands::Delete(args) => run_delete(&args, cli.history_db, &config),
        Commands::History(args) => run_history(&args, cli.history_db, &config),
    }
}

/// Open the history store, resolving the path from CLI flag, config
/// file, then the per-user default.
fn open_history_store(
    cli_override: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<HistoryStore> {
    let path = match cli_override.or_else(|| config.history_db.clone()) {
        Some(path) => path,
        None => HistoryStore::default_path()?,
    };
    let store = HistoryStore::open(&path)
        .with_context(|| format!("cannot open history store at {}", path.display()))?;
    Ok(store)
}

fn run_scan(args: &ScanArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            log::warn!("Failed to register Ctrl+C handler: {e}");
        }
    }

    let mut walker = WalkerConfig::default()
        .with_max_directories(args.max_dirs.map(|n| n as usize));
    if !args.extensions.is_empty() {
        walker = walker.with_extensions(args.extensions.clone());
    }

    let mut finder_config = FinderConfig::default()
        .with_walker_config(walker)
        .with_io_threads(args.io_threads)
        .with_shutdown_flag(shutdown);

    let show_progress = args.output == OutputFormat::Text && !args.no_progress && !quiet;
    if show_progress {
        finder_config =
            finder_config.with_progress_callback(Arc::new(progress::IndicatifReporter::new()));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = finder.find_duplicates(&args.path)?;

    match args.output {
        OutputFormat::Json => {
            let report = output::JsonScanReport::new(&groups, &summary);
            println!("{}", report.to_json_pretty()?);
        }
        OutputFormat::Text => {
            print!("{}", output::render_groups_text(&groups, &summary));
        }
    }

    if summary.has_skips() {
        Ok(ExitCode::PartialSuccess)
    } else if groups.is_empty() {
        Ok(ExitCode::NoDuplicates)
    } else {
        Ok(ExitCode::Success)
    }
}

fn run_delete(
    args: &DeleteArgs,
    history_db: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<ExitCode> {
    if !args.yes && !confirm(&format!("Delete {} file(s)?", args.paths.len()))? {
        println!("Aborted, nothing deleted.");
        return Ok(ExitCode::Success);
    }

    let history = open_history_store(history_db, config)?;
    let log_path = config.resolve_log_file(args.log.clone());

    let batch = delete_files(&args.paths, &log_path, &history)?;

    println!("{}", batch.summary());
    for record in &batch.records {
        if let actions::DeleteOutcome::Denied { reason } = &record.outcome {
            eprintln!("Denied {}: {}", record.path.display(), reason);
        }
    }

    if batch.denied_count() > 0 {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}

fn run_history(
    args: &HistoryArgs,
    history_db: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<ExitCode> {
    let history = open_history_store(history_db, config)?;
    let entries = history.query(args.limit.map(|n| n as usize))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print!("{}", output::render_history_text(&entries)),
    }

    Ok(ExitCode::Success)
}

/// Ask a yes/no question on stdin, defaulting to no.
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    use std::io::Write;

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}
