//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::protocol::DEFAULT_PORT;
use crate::render::OutputFormat;

/// Watcher - observe installed runtime versions across a fleet of hosts.
#[derive(Debug, Parser)]
#[command(name = "watcher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// API key for remote hosts (overrides WATCHER_API_KEY and the saved key)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show installed runtimes, locally or on a remote host
    #[command(subcommand)]
    Get(GetCommands),

    /// Compare runtimes across hosts
    #[command(subcommand)]
    Compare(CompareCommands),

    /// Manage the client API key
    #[command(subcommand)]
    Key(KeyCommands),

    /// Run the observation server and manage its keys
    #[command(subcommand)]
    Serve(ServeCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// `get` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum GetCommands {
    /// List installed runtimes
    Runtimes(GetRuntimesArgs),

    /// Show a single runtime
    Runtime(GetRuntimeArgs),
}

/// Arguments for `get runtimes`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GetRuntimesArgs {
    /// Remote host to query (local when omitted)
    #[arg(long)]
    pub host: Option<String>,

    /// Only these runtimes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub runtime: Vec<String>,
}

/// Arguments for `get runtime`.
#[derive(Debug, Clone, clap::Args)]
pub struct GetRuntimeArgs {
    /// Runtime name (e.g. java, python, node)
    pub name: String,

    /// Remote host to query (local when omitted)
    #[arg(long)]
    pub host: Option<String>,
}

/// `compare` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CompareCommands {
    /// Compare runtime versions across hosts
    Runtimes(CompareRuntimesArgs),
}

/// Arguments for `compare runtimes`.
#[derive(Debug, Clone, clap::Args)]
pub struct CompareRuntimesArgs {
    /// Hosts to compare (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub hosts: Vec<String>,

    /// Overall deadline in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// `key` subcommands.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum KeyCommands {
    /// Generate and save a new default API key
    Gen,

    /// Show the API key that would be used, masked
    Show,
}

/// `serve` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ServeCommands {
    /// Start the observation server
    Run(ServeRunArgs),

    /// Manage the keys the server accepts
    #[command(subcommand)]
    Key(ServerKeyCommands),
}

/// Arguments for `serve run`.
#[derive(Debug, Clone, clap::Args)]
pub struct ServeRunArgs {
    /// Address to bind
    #[arg(long, env = "WATCHER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "WATCHER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Keystore file (defaults to <watcher home>/server/keys.json)
    #[arg(long)]
    pub keystore: Option<PathBuf>,

    /// Accept requests without an API key
    #[arg(long)]
    pub disable_auth: bool,
}

/// `serve key` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ServerKeyCommands {
    /// Register a key
    Add {
        key: String,
        description: Option<String>,
    },

    /// Remove a key
    Delete { key: String },

    /// List registered keys
    List,

    /// Remove every key
    Clear,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
