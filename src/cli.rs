//! Command-line interface definitions for dupehist.
//!
//! This module defines all CLI arguments, subcommands, and options using
//! the clap derive API. The CLI follows standard conventions with global
//! options (verbosity, history database location) and subcommands for the
//! three core operations.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and print duplicate groups
//! dupehist scan ~/Downloads
//!
//! # Scan only images, JSON output for scripting
//! dupehist scan ~/Pictures --ext jpg --ext png --output json
//!
//! # Bounded scan of a huge tree: stop after 500 directories
//! dupehist scan /mnt/archive --max-dirs 500
//!
//! # Delete selected duplicates without a confirmation prompt
//! dupehist delete /tmp/copy1.txt /tmp/copy2.txt --yes
//!
//! # Show the most recent deletion batches
//! dupehist history --limit 10
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Duplicate file finder and cleaner with a durable deletion history.
///
/// dupehist finds byte-identical files using content fingerprints
/// (SHA-256), deletes the copies you select, and keeps an append-only
/// record of every batch it freed.
#[derive(Debug, Parser)]
#[command(name = "dupehist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Path to the history database
    ///
    /// If not specified, the config file and then a default
    /// platform-specific path are used.
    #[arg(long, value_name = "PATH", env = "DUPEHIST_DB", global = true)]
    pub history_db: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupehist.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Delete files and record the batch in the history
    Delete(DeleteArgs),
    /// Show recorded deletion batches, newest first
    History(HistoryArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only consider files with this suffix (repeatable)
    ///
    /// Case-insensitive; a leading dot is optional ("jpg" and ".jpg"
    /// are equivalent).
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Stop after visiting this many directories
    ///
    /// Bounds how long a single scan of a huge tree can block. Results
    /// are partial: only directories visited before the cap contribute.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_dirs: Option<u64>,

    /// Number of I/O threads for fingerprinting
    #[arg(long, value_name = "N", default_value = "4")]
    pub io_threads: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Files to delete
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Path of the append-only deletion log
    ///
    /// If not specified, the config file and then
    /// "duplicate_cleaner.log" in the working directory are used.
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the history subcommand.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Only show this many most-recent batches
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for scan and history results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}
