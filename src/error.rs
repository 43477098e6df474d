//! Error types for Watcher operations.
//!
//! This module defines [`WatcherError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected conditions (a tool is not installed, a version string cannot be
//!   parsed, one host of many is down) are data, not errors
//! - Use `WatcherError` for failures the immediate caller must see
//! - Use `anyhow::Error` (via `WatcherError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Watcher operations.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// A tool executable was located but running it failed.
    #[error("Failed to probe '{tool}': {message}")]
    ProbeFailed { tool: String, message: String },

    /// A runtime name is not known to the detector registry.
    #[error("Unknown runtime: {name}")]
    UnknownRuntime { name: String },

    /// Attempted to add a key that is already registered.
    #[error("Key already exists")]
    DuplicateKey,

    /// Attempted to remove or load a key that is not registered.
    #[error("Key not found")]
    KeyNotFound,

    /// A client key name that cannot be used as a file name.
    #[error("Invalid key name: {name}")]
    InvalidKeyName { name: String },

    /// The keystore file exists but could not be parsed.
    #[error("Failed to parse keystore at {path}: {message}")]
    KeyStoreCorrupt { path: PathBuf, message: String },

    /// Could not reach a remote host.
    #[error("Failed to connect to {host}: {message}")]
    Connect { host: String, message: String },

    /// A remote call did not complete in time.
    #[error("Timed out waiting for {host}")]
    Timeout { host: String },

    /// The remote rejected the call because no credential was sent.
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// The remote rejected the credential that was sent.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// The remote call failed for any other reason.
    #[error("RPC call failed ({status}): {message}")]
    Rpc { status: u16, message: String },

    /// The client was used after `close()`.
    #[error("Client connection is closed")]
    ClientClosed,

    /// A comparison was requested without any hosts.
    #[error("No hosts given to compare")]
    NoHosts,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_failed_displays_tool_and_message() {
        let err = WatcherError::ProbeFailed {
            tool: "java".into(),
            message: "exit status 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("java"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn unknown_runtime_displays_name() {
        let err = WatcherError::UnknownRuntime {
            name: "cobol".into(),
        };
        assert!(err.to_string().contains("cobol"));
    }

    #[test]
    fn keystore_corrupt_displays_path() {
        let err = WatcherError::KeyStoreCorrupt {
            path: PathBuf::from("/srv/keys.json"),
            message: "expected value".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/srv/keys.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn connect_displays_host() {
        let err = WatcherError::Connect {
            host: "server1:9090".into(),
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("server1:9090"));
    }

    #[test]
    fn rpc_displays_status() {
        let err = WatcherError::Rpc {
            status: 500,
            message: "boom".into(),
        };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WatcherError = io_err.into();
        assert!(matches!(err, WatcherError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(WatcherError::DuplicateKey)
        }
        assert!(returns_error().is_err());
    }
}
