//! Locating tool executables and running their version commands.
//!
//! Lookups walk the search path directly instead of shelling out to `which`,
//! which behaves differently across systems and is sometimes a shell builtin.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use regex::Regex;

use crate::error::{Result, WatcherError};

use super::types::Runtime;

/// One executable name a detector may find a tool under.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Executable name looked up on the search path.
    pub command: &'static str,
    /// Runtime name reported when this candidate wins, if it differs from
    /// the detector's own name.
    pub reports_as: Option<&'static str>,
}

impl Candidate {
    /// A candidate reported under the detector's own name.
    pub const fn named(command: &'static str) -> Self {
        Self {
            command,
            reports_as: None,
        }
    }

    /// A candidate that reports a different runtime name.
    pub const fn reporting(command: &'static str, name: &'static str) -> Self {
        Self {
            command,
            reports_as: Some(name),
        }
    }
}

/// How to find and query one tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolProbe {
    /// Detector name.
    pub name: &'static str,
    /// Executables to try, highest priority first.
    pub candidates: &'static [Candidate],
    /// Arguments that make the tool print its version.
    pub args: &'static [&'static str],
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over search path entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let file_name = format!("{}{}", tool, std::env::consts::EXE_SUFFIX);
    for dir in path_entries {
        let candidate = dir.join(&file_name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Run a version command and return stdout and stderr combined.
///
/// Many tools print their version on stderr, and some exit non-zero even
/// when they did. Only a spawn failure, or a non-zero exit with nothing
/// printed, counts as a failure.
pub fn run_version_command(tool: &str, path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| WatcherError::ProbeFailed {
            tool: tool.to_string(),
            message: format!("failed to execute {}: {}", path.display(), e),
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() && combined.trim().is_empty() {
        return Err(WatcherError::ProbeFailed {
            tool: tool.to_string(),
            message: format!(
                "{} {} exited with {}",
                path.display(),
                args.join(" "),
                output.status
            ),
        });
    }

    Ok(combined)
}

/// Locate a tool, run its version command and parse the result.
pub fn probe_tool(
    probe: &ToolProbe,
    search_path: &[PathBuf],
    parse: fn(&str) -> String,
) -> Result<Runtime> {
    let located = probe.candidates.iter().find_map(|candidate| {
        resolve_tool_path(candidate.command, search_path).map(|path| (candidate, path))
    });

    let Some((candidate, path)) = located else {
        tracing::debug!("{} not found on search path", probe.name);
        return Ok(Runtime::not_found(probe.name));
    };

    let name = candidate.reports_as.unwrap_or(probe.name);
    tracing::debug!("Probing {} at {}", name, path.display());

    let output = run_version_command(name, &path, probe.args)?;
    Ok(Runtime::found(name, parse(&output), path))
}

/// Return the first capture group of `re` in `text`.
pub fn capture_first(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
