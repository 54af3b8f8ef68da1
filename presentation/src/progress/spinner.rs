//! Spinner shown while a request is outstanding

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// A spinner on stderr that clears itself when dropped.
///
/// Disabled spinners draw nothing, so callers need not branch on `--quiet`.
pub struct RequestSpinner {
    bar: Option<ProgressBar>,
}

impl RequestSpinner {
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop and leave a failure marker behind
    pub fn fail(mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("{} {}", "x".red(), message));
        }
    }
}

impl Drop for RequestSpinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Await `future` behind a spinner
pub async fn with_spinner<F: Future>(message: &str, enabled: bool, future: F) -> F::Output {
    let _spinner = RequestSpinner::start(message, enabled);
    future.await
}
