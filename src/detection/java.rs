//! Java detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "java",
    candidates: &[Candidate::named("java")],
    args: &["-version"],
};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version "(.+?)""#).expect("VERSION_RE must compile"));

/// Detects a JDK or JRE via `java -version` (printed on stderr).
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaDetector;

impl Detector for JavaDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_java_version)
    }
}

/// Extract the version from `java -version` output.
///
/// Legacy `1.x` version strings are reported as the marketing version
/// `x.x`, so `1.8.0_372` becomes `8.x`. This drops the update number.
pub fn parse_java_version(output: &str) -> String {
    let Some(version) = capture_first(&VERSION_RE, output) else {
        return UNKNOWN_VERSION.to_string();
    };

    if let Some(rest) = version.strip_prefix("1.") {
        if let Some(major) = rest.split('.').next().filter(|m| !m.is_empty()) {
            return format!("{}.x", major);
        }
    }

    version
}
