//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.

use super::{OutputMode, SpinnerHandle, UserInterface, WatcherTheme};

/// Mock UI implementation for testing.
#[derive(Debug)]
pub struct MockUI {
    mode: OutputMode,
    theme: WatcherTheme,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    emitted: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
}

impl Default for MockUI {
    fn default() -> Self {
        Self::with_mode(OutputMode::Normal)
    }
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: WatcherTheme::plain(),
            messages: Vec::new(),
            successes: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            emitted: Vec::new(),
            headers: Vec::new(),
            spinners: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Everything written with `emit`.
    pub fn emitted(&self) -> &[String] {
        &self.emitted
    }

    /// All emitted text joined with newlines.
    pub fn emitted_text(&self) -> String {
        self.emitted.join("\n")
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Messages of every spinner that was started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Check whether any captured status line contains `needle`.
    pub fn has_message(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn emit(&mut self, text: &str) {
        self.emitted.push(text.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn theme(&self) -> &WatcherTheme {
        &self.theme
    }
}

/// Spinner that does nothing.
#[derive(Debug, Default)]
pub struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
    fn finish_clear(&mut self) {}
}
