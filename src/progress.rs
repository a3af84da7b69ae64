//! Progress reporting for the fingerprinting phase.
//!
//! The library core reports progress through the [`ProgressCallback`]
//! trait so it stays agnostic of the output medium; the CLI wires in
//! [`IndicatifReporter`] for a terminal progress bar. Callbacks are
//! invoked from worker threads and must be `Send + Sync`.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Callback interface for scan progress events.
pub trait ProgressCallback: Send + Sync {
    /// Called once before fingerprinting starts, with the number of
    /// candidate files.
    fn on_hash_start(&self, total_files: usize);

    /// Called after each file is fingerprinted (or fails to be).
    fn on_file_hashed(&self, path: &Path);

    /// Called once when the fingerprinting phase completes.
    fn on_hash_complete(&self);
}

/// No-op callback for callers that don't need progress reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_hash_start(&self, _total_files: usize) {}
    fn on_file_hashed(&self, _path: &Path) {}
    fn on_hash_complete(&self) {}
}

/// Terminal progress bar backed by indicatif.
pub struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    /// Create a reporter with a hidden bar; it becomes visible once the
    /// hashing phase announces its length.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for IndicatifReporter {
    fn on_hash_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.set_position(0);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_file_hashed(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_hash_complete(&self) {
        self.bar.finish_and_clear();
    }
}
