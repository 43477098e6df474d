//! Consistency classification for one runtime across hosts.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell value for a host whose fetch failed.
pub const ERROR_MARKER: &str = "ERROR";

/// Cell value for a host that does not have the runtime.
pub const MISSING_MARKER: &str = "-";

/// One host's value for a runtime.
///
/// Kept apart from the rendered text so that a tool reporting a version
/// spelled like a marker is still counted as installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionCell<'a> {
    /// The runtime is installed at this version.
    Version(&'a str),
    /// The host answered without the runtime.
    Missing,
    /// The host could not be queried.
    Error,
}

impl VersionCell<'_> {
    /// Text shown in the comparison matrix.
    pub fn as_str(&self) -> &str {
        match self {
            VersionCell::Version(version) => version,
            VersionCell::Missing => MISSING_MARKER,
            VersionCell::Error => ERROR_MARKER,
        }
    }
}

/// How a runtime's versions line up across hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonStatus {
    /// Every host has the same version.
    Same,
    /// Every host has it, with more than one version.
    Diff,
    /// Some hosts lack it.
    Partial,
    /// No host has it.
    Missing,
    /// At least one host could not be queried.
    Error,
}

impl ComparisonStatus {
    /// Classify one row of per-host values.
    ///
    /// Rules apply in order: any error, all missing, any missing, then one
    /// distinct version versus several. An empty row is `Missing`.
    pub fn classify(cells: &[VersionCell<'_>]) -> Self {
        if cells.contains(&VersionCell::Error) {
            return ComparisonStatus::Error;
        }

        let missing = cells
            .iter()
            .filter(|c| **c == VersionCell::Missing)
            .count();
        if missing == cells.len() {
            return ComparisonStatus::Missing;
        }
        if missing > 0 {
            return ComparisonStatus::Partial;
        }

        let distinct: HashSet<&VersionCell<'_>> = cells.iter().collect();
        if distinct.len() == 1 {
            ComparisonStatus::Same
        } else {
            ComparisonStatus::Diff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonStatus::Same => "SAME",
            ComparisonStatus::Diff => "DIFF",
            ComparisonStatus::Partial => "PARTIAL",
            ComparisonStatus::Missing => "MISSING",
            ComparisonStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
