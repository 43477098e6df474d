//! Go toolchain detection.

use std::path::PathBuf;

use crate::error::Result;

use super::probe::{probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "go",
    candidates: &[Candidate::named("go")],
    args: &["version"],
};

/// Detects the Go toolchain via `go version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoDetector;

impl Detector for GoDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_go_version)
    }
}

/// Extract the version from `go version` output.
///
/// The output is `go version go1.21.5 linux/amd64`; the third field carries
/// the version behind a `go` prefix.
pub fn parse_go_version(output: &str) -> String {
    output
        .split_whitespace()
        .nth(2)
        .and_then(|field| field.strip_prefix("go"))
        .filter(|version| !version.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
