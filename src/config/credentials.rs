//! Client credential resolution.

use std::fmt;
use std::path::PathBuf;

use crate::auth::KeyManager;
use crate::error::WatcherError;

use super::paths::DEFAULT_KEY_NAME;

/// Environment variable holding the client API key.
pub const API_KEY_ENV: &str = "WATCHER_API_KEY";

/// Where a resolved API key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// The `--api-key` flag.
    Flag,
    /// The `WATCHER_API_KEY` environment variable.
    Environment,
    /// A key file on disk.
    KeyFile(PathBuf),
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeySource::Flag => write!(f, "--api-key flag"),
            ApiKeySource::Environment => write!(f, "{} environment variable", API_KEY_ENV),
            ApiKeySource::KeyFile(path) => write!(f, "key file {}", path.display()),
        }
    }
}

/// An API key together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiKey {
    pub value: String,
    pub source: ApiKeySource,
}

/// Pick the API key to use for remote calls.
///
/// Precedence: the flag, then the environment variable, then the key file.
/// Empty values count as unset. Returns `None` when no source has a key.
pub fn resolve_api_key(
    flag: Option<&str>,
    env_value: Option<&str>,
    keys: &KeyManager,
) -> Option<ResolvedApiKey> {
    if let Some(value) = non_empty(flag) {
        return Some(ResolvedApiKey {
            value,
            source: ApiKeySource::Flag,
        });
    }

    if let Some(value) = non_empty(env_value) {
        return Some(ResolvedApiKey {
            value,
            source: ApiKeySource::Environment,
        });
    }

    let path = keys.key_path(DEFAULT_KEY_NAME).ok()?;
    match keys.load(DEFAULT_KEY_NAME) {
        Ok(contents) => non_empty(Some(&contents)).map(|value| ResolvedApiKey {
            value,
            source: ApiKeySource::KeyFile(path),
        }),
        Err(WatcherError::KeyNotFound) => None,
        Err(e) => {
            tracing::debug!("Could not read key file {}: {}", path.display(), e);
            None
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
