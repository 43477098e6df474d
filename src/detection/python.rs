//! Python detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "python",
    candidates: &[Candidate::named("python3"), Candidate::named("python")],
    args: &["--version"],
};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python (\d+\.\d+\.\d+)").expect("VERSION_RE must compile"));

/// Detects Python, preferring `python3` over `python`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonDetector;

impl Detector for PythonDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_python_version)
    }
}

/// Extract the version from `python --version` output.
pub fn parse_python_version(output: &str) -> String {
    capture_first(&VERSION_RE, output)
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
