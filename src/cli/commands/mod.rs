//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`watcher get`, `watcher compare`)
//! - Credential resolution in one place
//! - Consistent global flag handling

pub mod compare;
pub mod completions;
pub mod dispatcher;
pub mod get;
pub mod key;
pub mod serve;

pub use dispatcher::{block_on, Command, CommandDispatcher, CommandResult};
