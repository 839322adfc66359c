//! Progress display for batch resolution
//!
//! Draws a bar on stderr while dependencies are resolved, using indicatif.
//! Disabled for `--quiet` and `--json`.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress reporter for a batch run
///
/// Cheap to clone; clones share the same bar, so concurrent tasks can each
/// report completion.
#[derive(Clone)]
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a progress reporter; `enabled = false` draws nothing
    pub fn new(enabled: bool) -> Self {
        Self {
            bar: enabled.then(|| ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())),
        }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns true if anything is drawn
    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    /// Start counting towards `total` items
    pub fn start(&self, total: u64, message: &str) {
        let Some(bar) = &self.bar else { return };

        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        bar.set_style(style);
        bar.set_length(total);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
    }

    /// Mark one dependency as done
    pub fn inc(&self, dependency: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(dependency.to_string());
            bar.inc(1);
        }
    }

    /// Number of completed items
    pub fn position(&self) -> u64 {
        self.bar.as_ref().map(|b| b.position()).unwrap_or(0)
    }

    /// Finish and clear the bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}
