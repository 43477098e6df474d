//! Detector trait and the runtime record it produces.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::probe::parse_system_path;

/// Version reported when a tool ran but its output could not be parsed.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A detected (or absent) runtime on one machine.
///
/// Records are immutable once a detector produces them. For a runtime that
/// was not found, [`version`](Runtime::version) and [`path`](Runtime::path)
/// return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    path: PathBuf,
    found: bool,
}

impl Runtime {
    /// Create a record for a runtime that was found.
    pub fn found(
        name: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path: path.into(),
            found: true,
        }
    }

    /// Create a record for a runtime that is not installed.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            path: PathBuf::new(),
            found: false,
        }
    }

    /// Runtime identifier (e.g. "java").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the runtime was found.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Detected version, or `None` when the runtime was not found.
    pub fn version(&self) -> Option<&str> {
        self.found.then_some(self.version.as_str())
    }

    /// Executable path, or `None` when the runtime was not found.
    pub fn path(&self) -> Option<&Path> {
        self.found.then_some(self.path.as_path())
    }
}

/// A probe for one tool.
///
/// Implementations hold no mutable state; detecting twice on the same
/// machine yields the same record.
pub trait Detector: Send + Sync {
    /// Stable lowercase identifier of this detector.
    fn name(&self) -> &str;

    /// Detect the tool using the given search path entries.
    ///
    /// Absence is `Ok` with a not-found record. An error means the executable
    /// was located but could not be run.
    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime>;

    /// Detect the tool on the process `PATH`.
    fn detect(&self) -> Result<Runtime> {
        self.detect_in(&parse_system_path())
    }
}
