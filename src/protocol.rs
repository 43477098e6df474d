//! Wire types for the observation API.
//!
//! The API is JSON over HTTP. A client POSTs an [`ObserveRequest`] to
//! [`OBSERVE_PATH`] with its key in the [`API_KEY_HEADER`] header and gets an
//! [`ObservationSnapshot`] back. Rejected calls carry an [`ErrorBody`].

use serde::{Deserialize, Serialize};

use crate::detection::Runtime;

/// Route of the observation call.
pub const OBSERVE_PATH: &str = "/v1/observe";

/// Port the agent listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 9090;

/// Request header carrying the client's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Body of an observation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserveRequest {
    /// Runtime names to report. Empty means all of them.
    #[serde(default)]
    pub runtime_filter: Vec<String>,
}

impl ObserveRequest {
    pub fn filtered(names: &[String]) -> Self {
        Self {
            runtime_filter: names.to_vec(),
        }
    }
}

/// Identity of the host that produced a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub hostname: String,
    pub os: String,
    pub kernel: String,
}

/// Found runtimes on one host at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    /// Found runtimes, in detector order.
    pub runtimes: Vec<Runtime>,
    pub system_info: SystemInfo,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Error code for a request without an API key.
pub const CODE_UNAUTHENTICATED: &str = "unauthenticated";

/// Error code for a request whose API key was rejected.
pub const CODE_PERMISSION_DENIED: &str = "permission_denied";

/// Error code for a failure inside the agent.
pub const CODE_INTERNAL: &str = "internal";

/// JSON body returned with a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            code: CODE_UNAUTHENTICATED.to_string(),
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self {
            code: CODE_PERMISSION_DENIED.to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: CODE_INTERNAL.to_string(),
            message: message.into(),
        }
    }
}
