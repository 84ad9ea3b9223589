//! CLI presenter for output formatting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Width of the rule drawn around the text panel
const PANEL_WIDTH: usize = 48;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    pub fn is_spinner_active(&self) -> bool {
        self.is_spinner_active.load(Ordering::SeqCst)
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message))
            }
            Some(spinner) => {
                spinner.finish_and_clear();
                self.success(message);
            }
            None => self.success(message),
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message))
            }
            Some(spinner) => {
                spinner.finish_and_clear();
                self.error(message);
            }
            None => self.error(message),
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_line(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_line(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_line(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_line(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout (the corrected text itself)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print service status
    pub fn service_status(&self, state: &str) {
        self.print_line(format!("{} Service: {}", "●".cyan(), state));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the text panel to stderr
    pub fn panel(&self, original: &str, corrected: &str) {
        for line in format_panel(original, corrected).lines() {
            self.print_line(line.to_string());
        }
    }

    /// Stderr line that does not tear a running spinner
    fn print_line(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the original and corrected text as two labelled sections
pub fn format_panel(original: &str, corrected: &str) -> String {
    let rule = "─".repeat(PANEL_WIDTH);
    let corrected = if corrected.is_empty() {
        "(waiting for correction)".dimmed().to_string()
    } else {
        corrected.to_string()
    };
    format!(
        "{rule}\n{}\n{original}\n{}\n{corrected}\n{rule}",
        "Original".bold(),
        "Corrected".bold().green(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_shows_both_texts() {
        colored::control::set_override(false);
        let panel = format_panel("este testo", "este texto");
        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(lines[1], "Original");
        assert_eq!(lines[2], "este testo");
        assert_eq!(lines[3], "Corrected");
        assert_eq!(lines[4], "este texto");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn panel_marks_pending_correction() {
        colored::control::set_override(false);
        let panel = format_panel("este testo", "");
        assert!(panel.contains("(waiting for correction)"));
    }

    #[test]
    fn spinner_state_tracks_lifecycle() {
        let mut presenter = Presenter::new();
        assert!(!presenter.is_spinner_active());
        presenter.start_spinner("Correcting...");
        assert!(presenter.is_spinner_active());
        presenter.stop_spinner();
        assert!(!presenter.is_spinner_active());
    }
}
