//! Serve command implementations.
//!
//! `watcher serve run` starts the observation server and `watcher serve key`
//! manages the keys it accepts.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::auth::{mask_key, KeyInfo, KeyStore, Validator};
use crate::cli::args::{ServeRunArgs, ServerKeyCommands};
use crate::config::WatcherPaths;
use crate::error::Result;
use crate::render::{server_keys_table, to_structured, OutputFormat};
use crate::server::{observation_router, serve, ObservationService};
use crate::ui::UserInterface;

use super::dispatcher::{block_on, Command, CommandResult};

/// The `serve run` command implementation.
pub struct ServeCommand {
    args: ServeRunArgs,
    keystore: PathBuf,
}

impl ServeCommand {
    /// Create a new serve command.
    pub fn new(args: ServeRunArgs, paths: &WatcherPaths) -> Self {
        let keystore = args
            .keystore
            .clone()
            .unwrap_or_else(|| paths.server_keystore());
        Self { args, keystore }
    }

    fn validator(&self) -> Result<Option<Arc<dyn Validator>>> {
        if self.args.disable_auth {
            tracing::warn!("Authentication is disabled; any client can observe this host");
            return Ok(None);
        }

        let store = KeyStore::open(&self.keystore)?;
        if store.is_empty() {
            tracing::warn!(
                "No API keys registered in {}; all requests will be rejected",
                self.keystore.display()
            );
        } else {
            tracing::info!("Loaded {} API key(s)", store.len());
        }
        let validator: Arc<dyn Validator> = Arc::new(store);
        Ok(Some(validator))
    }
}

impl Command for ServeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let validator = self.validator()?;
        let app = observation_router(ObservationService::new(), validator);

        ui.show_header("Watcher observation server");
        let host = self.args.host.clone();
        let port = self.args.port;
        block_on(async move {
            let listener = TcpListener::bind((host.as_str(), port)).await?;
            serve(listener, app, async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await
        })??;

        Ok(CommandResult::success())
    }
}

/// The `serve key` command implementation.
pub struct ServerKeyCommand {
    action: ServerKeyCommands,
    keystore: PathBuf,
    format: OutputFormat,
}

impl ServerKeyCommand {
    /// Create a new server key command using the default keystore.
    pub fn new(action: ServerKeyCommands, paths: &WatcherPaths, format: OutputFormat) -> Self {
        Self::with_keystore(action, paths.server_keystore(), format)
    }

    /// Create a new server key command for a specific keystore file.
    pub fn with_keystore(
        action: ServerKeyCommands,
        keystore: PathBuf,
        format: OutputFormat,
    ) -> Self {
        Self {
            action,
            keystore,
            format,
        }
    }

    fn list(&self, store: &KeyStore, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let keys = store.list();

        if !self.format.is_table() {
            let masked: Vec<KeyInfo> = keys
                .into_iter()
                .map(|info| KeyInfo {
                    key: mask_key(&info.key),
                    ..info
                })
                .collect();
            if let Some(text) = to_structured(&masked, self.format)? {
                ui.emit(&text);
            }
            return Ok(CommandResult::success());
        }

        if keys.is_empty() {
            ui.warning("No API keys registered");
            return Ok(CommandResult::success());
        }

        ui.emit(&server_keys_table(&keys));
        Ok(CommandResult::success())
    }
}

impl Command for ServerKeyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = KeyStore::open(&self.keystore)?;

        match &self.action {
            ServerKeyCommands::Add { key, description } => {
                store.add(key, description.as_deref().unwrap_or_default())?;
                ui.success(&format!("Added API key {}", mask_key(key)));
            }
            ServerKeyCommands::Delete { key } => {
                store.remove(key)?;
                ui.success(&format!("Deleted API key {}", mask_key(key)));
            }
            ServerKeyCommands::List => return self.list(&store, ui),
            ServerKeyCommands::Clear => {
                let removed = store.len();
                store.clear()?;
                ui.success(&format!("Removed {} API key(s)", removed));
            }
        }

        Ok(CommandResult::success())
    }
}
