//! Terminal progress output for pipeline steps.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use didi_stack_core::{Reporter, ScaffoldError, Step};

/// Shows a spinner per running step and a check or cross when it ends.
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&mut self, title: &str) {
        self.clear_spinner();
        println!("{}", style(format!(" - {}", title)).cyan().bold());
    }

    fn step_started(&mut self, step: &Step) {
        self.clear_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("- {}", style(&step.name).bold()));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn step_succeeded(&mut self, step: &Step) {
        self.clear_spinner();
        println!(
            "{}  {}",
            style("✔").green(),
            style(format!("- {}", step.name)).green()
        );
    }

    fn step_failed(&mut self, step: &Step, error: &ScaffoldError) {
        self.clear_spinner();
        println!(
            "{}  {}",
            style("✖").red(),
            style(format!("- {} (Failed)", step.name)).red()
        );
        tracing::debug!(step = %step.name, error = ?error, "step failed");
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
