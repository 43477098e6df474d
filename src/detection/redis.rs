//! Redis detection.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::probe::{capture_first, probe_tool, Candidate, ToolProbe};
use super::types::{Detector, Runtime, UNKNOWN_VERSION};

const PROBE: ToolProbe = ToolProbe {
    name: "redis",
    candidates: &[Candidate::named("redis-server"), Candidate::named("redis-cli")],
    args: &["--version"],
};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v=(\d+\.\d+\.\d+)").expect("VERSION_RE must compile"));

/// Detects Redis via `redis-server`, or `redis-cli` when only the client is
/// installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisDetector;

impl Detector for RedisDetector {
    fn name(&self) -> &str {
        PROBE.name
    }

    fn detect_in(&self, search_path: &[PathBuf]) -> Result<Runtime> {
        probe_tool(&PROBE, search_path, parse_redis_version)
    }
}

/// Extract the version from `Redis server v=7.0.12 sha=...` output.
pub fn parse_redis_version(output: &str) -> String {
    capture_first(&VERSION_RE, output).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::test_support::create_fake_tool;
    use tempfile::TempDir;

    #[test]
    fn parses_server_output() {
        assert_eq!(
            parse_redis_version("Redis server v=7.0.12 sha=00000000:0 malloc=jemalloc-5.2.1"),
            "7.0.12"
        );
    }

    #[test]
    fn missing_version_is_unknown() {
        assert_eq!(
            parse_redis_version("Redis info missing version"),
            UNKNOWN_VERSION
        );
    }

    #[cfg(unix)]
    #[test]
    fn client_only_install_reports_redis() {
        let temp = TempDir::new().unwrap();
        create_fake_tool(temp.path(), "redis-cli", "echo 'redis-cli 7.2.4'");

        let runtime = RedisDetector
            .detect_in(&[temp.path().to_path_buf()])
            .unwrap();

        assert!(runtime.is_found());
        assert_eq!(runtime.name(), "redis");
        assert_eq!(runtime.path(), Some(temp.path().join("redis-cli").as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn server_binary_wins_over_client() {
        let temp = TempDir::new().unwrap();
        create_fake_tool(temp.path(), "redis-cli", "echo 'redis-cli 7.2.4'");
        create_fake_tool(
            temp.path(),
            "redis-server",
            "echo 'Redis server v=7.0.12 sha=00000000:0'",
        );

        let runtime = RedisDetector
            .detect_in(&[temp.path().to_path_buf()])
            .unwrap();

        assert_eq!(runtime.version(), Some("7.0.12"));
        assert_eq!(runtime.path(), Some(temp.path().join("redis-server").as_path()));
    }
}
