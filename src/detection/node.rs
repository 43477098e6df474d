//! Node.js detection.

use std::path::PathBuf;

use crate::error::Result;

use super::probe::{probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "node",
    candidates: &[Candidate::named("node")],
    args: &["--version"],
};

/// Detects Node.js via `node --version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeDetector;

impl Detector for NodeDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_node_version)
    }
}

/// Extract the version from `node --version` output (e.g. `v20.18.0`).
pub fn parse_node_version(output: &str) -> String {
    let line = output.lines().next().unwrap_or_default().trim();
    let version = line.strip_prefix('v').unwrap_or(line);

    if version.starts_with(|c: char| c.is_ascii_digit()) {
        version.to_string()
    } else {
        UNKNOWN_VERSION.to_string()
    }
}
