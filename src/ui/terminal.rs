//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{OutputMode, ProgressSpinner, SpinnerHandle, UserInterface, WatcherTheme};

/// Terminal UI implementation.
///
/// Results go to stdout; status, warnings and errors go to stderr so that
/// JSON and YAML output stays machine-readable.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: WatcherTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: WatcherTheme::for_colors(colors),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn emit(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && self.err.is_term() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn theme(&self) -> &WatcherTheme {
        &self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet, false);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn quiet_mode_hides_spinner() {
        let mut ui = TerminalUI::new(OutputMode::Quiet, false);
        let mut spinner = ui.start_spinner("Working");
        spinner.finish_clear();
    }
}
