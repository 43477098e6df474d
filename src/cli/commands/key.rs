//! Client key command implementation.
//!
//! `watcher key gen` creates and saves the default client key and
//! `watcher key show` reports which key remote calls would use.

use serde::Serialize;

use crate::auth::{mask_key, KeyManager};
use crate::cli::args::KeyCommands;
use crate::config::{ResolvedApiKey, WatcherPaths, DEFAULT_KEY_NAME};
use crate::error::Result;
use crate::render::{to_structured, OutputFormat};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

#[derive(Serialize)]
struct KeyReport<'a> {
    key: &'a str,
    source: String,
}

/// The key command implementation.
pub struct KeyCommand {
    action: KeyCommands,
    paths: WatcherPaths,
    api_key: Option<ResolvedApiKey>,
    format: OutputFormat,
}

impl KeyCommand {
    /// Create a new key command.
    pub fn new(
        action: KeyCommands,
        paths: WatcherPaths,
        api_key: Option<ResolvedApiKey>,
        format: OutputFormat,
    ) -> Self {
        Self {
            action,
            paths,
            api_key,
            format,
        }
    }

    fn generate(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manager = self.paths.key_manager();
        let key = KeyManager::generate()?;
        let path = manager.save(DEFAULT_KEY_NAME, &key)?;

        let report = KeyReport {
            key: &key,
            source: path.display().to_string(),
        };
        if let Some(text) = to_structured(&report, self.format)? {
            ui.emit(&text);
            return Ok(CommandResult::success());
        }

        ui.success(&format!("Saved new API key to {}", path.display()));
        ui.emit(&key);
        ui.message("Register it on each server with: watcher serve key add <KEY>");
        Ok(CommandResult::success())
    }

    fn show(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(resolved) = &self.api_key else {
            ui.error("No API key configured. Run 'watcher key gen' or pass --api-key.");
            return Ok(CommandResult::failure(1));
        };

        let masked = mask_key(&resolved.value);
        let report = KeyReport {
            key: &masked,
            source: resolved.source.to_string(),
        };
        if let Some(text) = to_structured(&report, self.format)? {
            ui.emit(&text);
            return Ok(CommandResult::success());
        }

        ui.emit(&masked);
        ui.message(&format!("Source: {}", resolved.source));
        Ok(CommandResult::success())
    }
}

impl Command for KeyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.action {
            KeyCommands::Gen => self.generate(ui),
            KeyCommands::Show => self.show(ui),
        }
    }
}
