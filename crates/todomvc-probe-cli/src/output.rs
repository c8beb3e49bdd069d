//! Output formatting and progress reporting

use crate::error::CliResult;
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use todomvc_probe::{Scenario, ScenarioResult, SuiteObserver, SuiteResults};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for suite execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        let write = || {
            let _ = self.term.write_line(text);
        };
        match self.progress_bar {
            Some(ref pb) => pb.suspend(write),
            None => write(),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures are printed in quiet mode too
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// Print suite summary
    pub fn summary(&self, passed: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        self.line("");

        let total = passed + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}

impl SuiteObserver for ProgressReporter {
    fn scenario_started(&mut self, scenario: Scenario) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(scenario.name());
        }
    }

    fn scenario_finished(&mut self, result: &ScenarioResult) {
        let millis = result.duration.as_millis();
        match &result.error {
            None => self.success(&format!("{} ({millis}ms)", result.name)),
            Some(error) => {
                self.failure(&format!("{} ({millis}ms)", result.name));
                self.line(&format!("     {}", error.message));
            }
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }
}

/// Pretty JSON for a finished suite
pub fn render_json(results: &SuiteResults) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Scenario listing, one per line
#[must_use]
pub fn render_scenario_list(scenarios: &[Scenario]) -> String {
    let width = scenarios
        .iter()
        .map(|s| s.name().len())
        .max()
        .unwrap_or(0);
    scenarios
        .iter()
        .map(|s| format!("{:<width$}  [{}] {}\n", s.name(), s.group(), s.description()))
        .collect()
}

/// Scenario listing as a JSON array
pub fn render_scenario_list_json(scenarios: &[Scenario]) -> CliResult<String> {
    let entries: Vec<_> = scenarios
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name(),
                "group": s.group(),
                "description": s.description(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
