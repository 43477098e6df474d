//! Watcher - observe installed runtime versions across a fleet of hosts.
//!
//! Watcher detects language runtimes and services (Java, Python, Node.js,
//! Go, Docker, MySQL, Redis, nginx) on a machine, serves that inventory to
//! authenticated clients over HTTP, and compares versions across many hosts.
//!
//! # Modules
//!
//! - [`auth`] - Server keystore, client key files, request authentication
//! - [`cli`] - Command-line interface and argument parsing
//! - [`client`] - Remote observation client
//! - [`compare`] - Concurrent multi-host comparison
//! - [`config`] - Watcher home layout and credential resolution
//! - [`detection`] - Runtime detectors and the detector registry
//! - [`error`] - Error types and result aliases
//! - [`protocol`] - Wire types shared by server and client
//! - [`render`] - Tables, JSON and YAML output
//! - [`server`] - Observation service and HTTP router
//! - [`ui`] - Spinners, tables, and terminal output
//!
//! # Example
//!
//! ```
//! use watcher::compare::{ComparisonStatus, VersionCell};
//!
//! let same = [VersionCell::Version("17.0.8"), VersionCell::Version("17.0.8")];
//! assert_eq!(ComparisonStatus::classify(&same), ComparisonStatus::Same);
//!
//! let partial = [VersionCell::Version("17.0.8"), VersionCell::Missing];
//! assert_eq!(ComparisonStatus::classify(&partial), ComparisonStatus::Partial);
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod compare;
pub mod config;
pub mod detection;
pub mod error;
pub mod protocol;
pub mod render;
pub mod server;
pub mod ui;

pub use error::{Result, WatcherError};
