//! MySQL / MariaDB client detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "mysql",
    candidates: &[
        Candidate::named("mysql"),
        Candidate::reporting("mariadb", "mariadb"),
    ],
    args: &["--version"],
};

static DISTRIB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Distrib (\d+\.\d+\.\d+)").expect("DISTRIB_RE must compile"));

static VER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ver (\d+\.\d+\.\d+)").expect("VER_RE must compile"));

/// Detects the MySQL client, falling back to the `mariadb` client.
///
/// When only `mariadb` is installed the runtime is reported as `mariadb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDetector;

impl Detector for MySqlDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_mysql_version)
    }
}

/// Extract the server version from `mysql --version` output.
///
/// MariaDB clients print the client protocol version after `Ver` and the
/// server version after `Distrib`; the latter wins when present.
pub fn parse_mysql_version(output: &str) -> String {
    capture_first(&DISTRIB_RE, output)
        .or_else(|| capture_first(&VER_RE, output))
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
