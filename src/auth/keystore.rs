//! Server-side store of accepted API keys.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::write_private_file;
use crate::error::{Result, WatcherError};

use super::Validator;

/// Metadata kept for one accepted key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub key: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The set of keys the server accepts.
///
/// Every mutation is written through to the backing JSON file before the
/// write lock is released. A store without a file lives only in memory.
#[derive(Debug)]
pub struct KeyStore {
    keys: RwLock<HashMap<String, KeyInfo>>,
    file_path: Option<PathBuf>,
}

impl KeyStore {
    /// Open the store backed by `path`, loading any keys already saved.
    ///
    /// A missing file yields an empty store. A file that is not a JSON array
    /// of keys is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let keys = load_keys(&path)?;
        tracing::debug!("Loaded {} key(s) from {}", keys.len(), path.display());

        Ok(Self {
            keys: RwLock::new(keys),
            file_path: Some(path),
        })
    }

    /// An empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            file_path: None,
        }
    }

    /// Register a new key.
    pub fn add(&self, key: &str, description: &str) -> Result<()> {
        let mut keys = self.write();
        if keys.contains_key(key) {
            return Err(WatcherError::DuplicateKey);
        }

        keys.insert(
            key.to_string(),
            KeyInfo {
                key: key.to_string(),
                description: description.to_string(),
                created_at: Utc::now(),
            },
        );

        self.persist(&keys)
    }

    /// Remove a registered key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut keys = self.write();
        if keys.remove(key).is_none() {
            return Err(WatcherError::KeyNotFound);
        }

        self.persist(&keys)
    }

    /// All registered keys, oldest first.
    pub fn list(&self) -> Vec<KeyInfo> {
        let mut infos: Vec<KeyInfo> = self.read().values().cloned().collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.key.cmp(&b.key)));
        infos
    }

    /// Remove every key.
    pub fn clear(&self) -> Result<()> {
        let mut keys = self.write();
        keys.clear();
        self.persist(&keys)
    }

    /// Whether the store holds no keys. An empty store rejects every request.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, KeyInfo>> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, KeyInfo>> {
        self.keys.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, keys: &HashMap<String, KeyInfo>) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let mut infos: Vec<&KeyInfo> = keys.values().collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.key.cmp(&b.key)));

        let json = serde_json::to_string_pretty(&infos).map_err(anyhow::Error::from)?;
        write_private_file(path, json.as_bytes())?;
        Ok(())
    }
}

impl Validator for KeyStore {
    fn validate(&self, candidate: &str) -> bool {
        let keys = self.read();
        if keys.is_empty() {
            return false;
        }

        let candidate_digest = Sha256::digest(candidate.as_bytes());
        let mut matched = false;
        for stored in keys.keys() {
            let stored_digest = Sha256::digest(stored.as_bytes());
            matched |= digests_equal(&candidate_digest, &stored_digest);
        }
        matched
    }
}

/// Compare two equal-length digests without branching on their contents.
fn digests_equal(a: &[u8], b: &[u8]) -> bool {
    let diff = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0 && a.len() == b.len()
}

fn load_keys(path: &Path) -> Result<HashMap<String, KeyInfo>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };

    let infos: Vec<KeyInfo> =
        serde_json::from_str(&data).map_err(|e| WatcherError::KeyStoreCorrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(infos
        .into_iter()
        .map(|info| (info.key.clone(), info))
        .collect())
}
