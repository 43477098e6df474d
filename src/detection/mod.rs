//! Runtime detection.
//!
//! Each supported tool has one [`Detector`] implementation. Detectors locate
//! the tool's executable on the search path, run its version command and
//! parse the output into a [`Runtime`] record.
//!
//! # Example
//!
//! ```no_run
//! use watcher::detection::all_detectors;
//!
//! for detector in all_detectors() {
//!     if let Ok(runtime) = detector.detect() {
//!         if let Some(version) = runtime.version() {
//!             println!("{} {}", runtime.name(), version);
//!         }
//!     }
//! }
//! ```

pub mod docker;
pub mod golang;
pub mod java;
pub mod mysql;
pub mod nginx;
pub mod node;
pub mod probe;
pub mod python;
pub mod redis;
pub mod registry;
pub mod types;

pub use docker::DockerDetector;
pub use golang::GoDetector;
pub use java::JavaDetector;
pub use mysql::MySqlDetector;
pub use nginx::NginxDetector;
pub use node::NodeDetector;
pub use python::PythonDetector;
pub use redis::RedisDetector;
pub use registry::{all_detectors, detector_names, filter_detectors, find_detector};
pub use types::{Detector, Runtime, UNKNOWN_VERSION};

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    /// Write an executable shell script named `name` into `dir`.
    pub fn create_fake_tool(dir: &Path, name: &str, body: &str) {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Create a non-executable file at a path.
    #[cfg(unix)]
    pub fn create_non_executable_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
