//! # Terminal Output
//!
//! Controls how `tasc` writes to the terminal: whether colors and emojis are
//! used, and how the live progress report is redrawn while an assembly runs.
//!
//! ## Respecting User Preferences
//!
//! Color is decided from:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Live report
//!
//! On a terminal, [`LiveWriter`] erases the previous report and draws the new
//! one in its place. When stdout is redirected, only the final report is
//! written, so logs and CI output get one clean table.

use std::env;
use std::io;

use console::{style, Term};

use crate::progress::ProjectState;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Builds the configuration from the `--color` flag value and the
    /// environment.
    ///
    /// `always` and `never` win over the environment; anything else detects.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
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

        Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Colors a project state for summary lines: green for success, red for
/// failure.
pub fn state_label(config: &OutputConfig, state: ProjectState) -> String {
    if !config.use_color {
        return state.to_string();
    }
    match state {
        ProjectState::Success => style(state).green().to_string(),
        ProjectState::Failed => style(state).red().bold().to_string(),
        _ => style(state).yellow().to_string(),
    }
}

/// Draws successive progress reports to stdout.
#[derive(Debug)]
pub struct LiveWriter {
    term: Term,
    redraw: bool,
    quiet: bool,
    drawn_lines: usize,
}

impl LiveWriter {
    /// A writer that redraws in place when stdout is a terminal.
    ///
    /// With `quiet` set nothing is written at all.
    pub fn new(quiet: bool) -> Self {
        let term = Term::stdout();
        let redraw = term.is_term();
        Self {
            term,
            redraw,
            quiet,
            drawn_lines: 0,
        }
    }

    /// Replaces the report on screen with `report`.
    ///
    /// Off a terminal intermediate reports are skipped.
    pub fn update(&mut self, report: &str) -> io::Result<()> {
        if self.quiet || !self.redraw {
            return Ok(());
        }
        self.draw(report)
    }

    /// Writes the report rendered from the final states.
    ///
    /// Reports from concurrent fetches can arrive out of order, so the last
    /// one received may be stale.
    pub fn finish(mut self, final_report: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.draw(final_report)
    }

    fn draw(&mut self, report: &str) -> io::Result<()> {
        if self.drawn_lines > 0 {
            self.term.clear_last_lines(self.drawn_lines)?;
        }
        self.term.write_str(report)?;
        self.term.flush()?;
        self.drawn_lines = report.lines().count();
        Ok(())
    }
}
