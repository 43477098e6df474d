//! Local runtime inventory.

use std::fmt;
use std::process::{Command, Stdio};
use std::sync::Arc;

use chrono::Utc;

use crate::detection::{all_detectors, filter_detectors, Detector, UNKNOWN_VERSION};
use crate::protocol::{ObservationSnapshot, SystemInfo};

/// Produces the detectors an observation runs.
pub type DetectorProvider = Arc<dyn Fn() -> Vec<Box<dyn Detector>> + Send + Sync>;

/// Runs detectors against this host and packages the results.
#[derive(Clone)]
pub struct ObservationService {
    provider: DetectorProvider,
}

impl ObservationService {
    /// A service that runs every built-in detector.
    pub fn new() -> Self {
        Self::with_provider(all_detectors)
    }

    /// A service that runs the detectors returned by `provider`.
    pub fn with_provider<F>(provider: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn Detector>> + Send + Sync + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Detect runtimes, keeping only those that are installed.
    ///
    /// `filter` limits detection to the named runtimes; an empty filter runs
    /// all of them. A detector that fails is logged and skipped. This blocks
    /// on child processes, so async callers should use `spawn_blocking`.
    pub fn observe(&self, filter: &[String]) -> ObservationSnapshot {
        let detectors = filter_detectors((self.provider)(), filter);

        let mut runtimes = Vec::new();
        for detector in &detectors {
            match detector.detect() {
                Ok(runtime) if runtime.is_found() => runtimes.push(runtime),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping {}: {}", detector.name(), e),
            }
        }

        tracing::debug!(
            "Observed {} of {} runtime(s)",
            runtimes.len(),
            detectors.len()
        );

        ObservationSnapshot {
            runtimes,
            system_info: system_info(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

impl Default for ObservationService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObservationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationService").finish_non_exhaustive()
    }
}

/// Describe the current host.
pub fn system_info() -> SystemInfo {
    SystemInfo {
        hostname: hostname(),
        os: std::env::consts::OS.to_string(),
        kernel: kernel_release(),
    }
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer is valid for `buf.len()` bytes and gethostname
    // writes at most that many
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return String::new();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_default()
}

fn kernel_release() -> String {
    Command::new("uname")
        .arg("-r")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|release| !release.is_empty())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
