//! Docker engine detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "docker",
    candidates: &[Candidate::named("docker")],
    args: &["--version"],
};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version (\d+\.\d+\.\d+)").expect("VERSION_RE must compile"));

/// Detects the Docker CLI via `docker --version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerDetector;

impl Detector for DockerDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_docker_version)
    }
}

/// Extract the version from `Docker version 24.0.5, build ced0996`.
pub fn parse_docker_version(output: &str) -> String {
    capture_first(&VERSION_RE, output)
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
