//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::future::Future;

use crate::cli::args::{Cli, Commands, CompareCommands, GetCommands, ServeCommands};
use crate::config::{resolve_api_key, ResolvedApiKey, WatcherPaths, API_KEY_ENV};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Run an async operation to completion from a synchronous command.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    paths: WatcherPaths,
}

impl CommandDispatcher {
    /// Create a new dispatcher rooted at the given watcher home.
    pub fn new(paths: WatcherPaths) -> Self {
        Self { paths }
    }

    /// Get the watcher home layout.
    pub fn paths(&self) -> &WatcherPaths {
        &self.paths
    }

    /// Resolve the client API key for this invocation.
    pub fn resolve_credential(&self, cli: &Cli) -> Option<ResolvedApiKey> {
        let env_value = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(
            cli.api_key.as_deref(),
            env_value.as_deref(),
            &self.paths.key_manager(),
        )
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Get(GetCommands::Runtimes(args)) => {
                let cmd = super::get::GetRuntimesCommand::new(
                    args.clone(),
                    cli.output,
                    self.resolve_credential(cli),
                );
                cmd.execute(ui)
            }
            Commands::Get(GetCommands::Runtime(args)) => {
                let cmd = super::get::GetRuntimeCommand::new(
                    args.clone(),
                    cli.output,
                    self.resolve_credential(cli),
                );
                cmd.execute(ui)
            }
            Commands::Compare(CompareCommands::Runtimes(args)) => {
                let cmd = super::compare::CompareCommand::new(
                    args.clone(),
                    cli.output,
                    self.resolve_credential(cli),
                );
                cmd.execute(ui)
            }
            Commands::Key(action) => {
                let cmd = super::key::KeyCommand::new(
                    *action,
                    self.paths.clone(),
                    self.resolve_credential(cli),
                    cli.output,
                );
                cmd.execute(ui)
            }
            Commands::Serve(ServeCommands::Run(args)) => {
                let cmd = super::serve::ServeCommand::new(args.clone(), &self.paths);
                cmd.execute(ui)
            }
            Commands::Serve(ServeCommands::Key(action)) => {
                let cmd =
                    super::serve::ServerKeyCommand::new(action.clone(), &self.paths, cli.output);
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
