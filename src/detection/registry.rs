//! The fixed set of detectors and helpers for selecting among them.

use crate::error::{Result, WatcherError};

use super::types::Detector;
use super::{
    DockerDetector, GoDetector, JavaDetector, MySqlDetector, NginxDetector, NodeDetector,
    PythonDetector, RedisDetector,
};

/// Every supported detector, in reporting order.
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(JavaDetector),
        Box::new(PythonDetector),
        Box::new(NodeDetector),
        Box::new(GoDetector),
        Box::new(DockerDetector),
        Box::new(MySqlDetector),
        Box::new(RedisDetector),
        Box::new(NginxDetector),
    ]
}

/// Names of every supported detector, in reporting order.
pub fn detector_names() -> Vec<String> {
    all_detectors()
        .iter()
        .map(|d| d.name().to_string())
        .collect()
}

/// Keep only detectors whose name appears in `names`.
///
/// An empty filter keeps everything. Aliases are accepted, unknown names are
/// ignored, and the original order is preserved.
pub fn filter_detectors(
    detectors: Vec<Box<dyn Detector>>,
    names: &[String],
) -> Vec<Box<dyn Detector>> {
    if names.is_empty() {
        return detectors;
    }

    detectors
        .into_iter()
        .filter(|d| names.iter().any(|n| canonical_name(n) == d.name()))
        .collect()
}

/// Map common alternate spellings onto detector names.
fn canonical_name(name: &str) -> &str {
    match name {
        "nodejs" => "node",
        "golang" => "go",
        "mariadb" => "mysql",
        "python3" => "python",
        other => other,
    }
}

/// Look up a single detector by name.
///
/// Accepts the alternate spellings `nodejs`, `golang`, `mariadb` and `python3`.
pub fn find_detector(name: &str) -> Result<Box<dyn Detector>> {
    let wanted = canonical_name(name);
    all_detectors()
        .into_iter()
        .find(|d| d.name() == wanted)
        .ok_or_else(|| WatcherError::UnknownRuntime {
            name: name.to_string(),
        })
}
