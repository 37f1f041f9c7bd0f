//! Terminal progress reporting for batch runs.

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::bare_name;
use crate::services::ProgressSink;

/// Progress bar fed by the batch runner's completion callbacks.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// The length stays zero until the first callback reports the number of
    /// supported members.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_message("Reading archive...");
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BatchProgress {
    fn on_progress(&self, completed: usize, total: usize, member_name: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
        self.bar.set_message(format!(
            "Processing ({}/{}): {}",
            completed,
            total,
            bare_name(member_name)
        ));
    }
}
