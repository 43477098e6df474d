//! Command-line interface for Watcher.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompareCommands, CompareRuntimesArgs, CompletionsArgs, GetCommands,
    GetRuntimeArgs, GetRuntimesArgs, KeyCommands, ServeCommands, ServeRunArgs, ServerKeyCommands,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
