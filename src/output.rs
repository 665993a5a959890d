//! # Output Configuration
//!
//! Controls how per-repository results are printed: with emoji markers on a
//! colour-capable terminal, with bracketed plain markers otherwise.
//!
//! The `--color=never|always|auto` flag wins. In `auto` mode, `NO_COLOR`,
//! `CLICOLOR=0` and `TERM=dumb` disable markers, `CLICOLOR_FORCE=1` enables
//! them, and otherwise the `console` crate decides from the terminal.

use std::env;

use crate::error::RepoFailure;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The marker printed before a result line.
    pub fn marker(&self, status: Status) -> &'static str {
        match (status, self.use_color) {
            (Status::Ok, true) => "✅",
            (Status::Ok, false) => "[OK]",
            (Status::Skipped, true) => "⏭️",
            (Status::Skipped, false) => "[SKIP]",
            (Status::Failed, true) => "❌",
            (Status::Failed, false) => "[FAIL]",
            (Status::Info, true) => "🔍",
            (Status::Info, false) => "[INFO]",
        }
    }

    /// `<marker> <message>`.
    pub fn line(&self, status: Status, message: impl std::fmt::Display) -> String {
        format!("{} {}", self.marker(status), message)
    }

    /// One line per failing repository, including the cause.
    pub fn failure_lines(&self, failures: &[RepoFailure]) -> Vec<String> {
        failures
            .iter()
            .map(|f| self.line(Status::Failed, f))
            .collect()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kind of result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Skipped,
    Failed,
    Info,
}
