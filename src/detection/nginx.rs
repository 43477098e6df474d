//! nginx detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "nginx",
    candidates: &[Candidate::named("nginx")],
    args: &["-v"],
};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nginx/(\d+\.\d+\.\d+)").expect("VERSION_RE must compile"));

/// Detects nginx via `nginx -v`, which reports on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct NginxDetector;

impl Detector for NginxDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_nginx_version)
    }
}

/// Extract the version from `nginx version: nginx/1.24.0`.
pub fn parse_nginx_version(output: &str) -> String {
    capture_first(&VERSION_RE, output).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
