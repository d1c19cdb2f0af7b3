//! Live progress display while polling a review.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::models::{Review, ReviewStatus};

/// Spinner shown while a review is being watched. One line, updated on
/// every status snapshot the poll loop delivers.
pub struct WatchUI {
    spinner: ProgressBar,
}

impl WatchUI {
    pub fn new(review_id: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("progress bar template is a valid static string"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message(format!("Watching review {}...", review_id));
        Self { spinner }
    }

    /// Update the line for a fresh status snapshot.
    pub fn update(&self, review: &Review) {
        let msg = match review.status {
            ReviewStatus::Pending => "Queued, waiting for the reviewer...".to_string(),
            ReviewStatus::InProgress => "Review in progress...".to_string(),
            other => format!("Status: {}", other.as_str()),
        };
        self.spinner.set_message(msg);
    }

    pub fn finish_failed(&self, reason: &str) {
        self.spinner
            .finish_with_message(style(reason.to_string()).red().to_string());
    }

    /// Clear the spinner line entirely (used before printing full output).
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}
