//! Client-side key files.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::config::write_private_file;
use crate::error::{Result, WatcherError};

/// Prefix of every generated key.
pub const KEY_PREFIX: &str = "watcher_";

/// Number of random bytes in a generated key.
const KEY_BYTES: usize = 32;

/// Stores client API keys as one file per key name.
#[derive(Debug, Clone)]
pub struct KeyManager {
    keys_dir: PathBuf,
}

impl KeyManager {
    pub fn new(keys_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys_dir: keys_dir.into(),
        }
    }

    /// Generate a fresh random key.
    pub fn generate() -> Result<String> {
        let mut bytes = [0u8; KEY_BYTES];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| anyhow::anyhow!("Failed to generate random bytes: {}", e))?;
        Ok(format!("{}{}", KEY_PREFIX, hex::encode(bytes)))
    }

    /// Save `key` under `name`, replacing any existing key of that name.
    pub fn save(&self, name: &str, key: &str) -> Result<PathBuf> {
        let path = self.key_path(name)?;
        write_private_file(&path, key.as_bytes())?;
        tracing::debug!("Saved key '{}' to {}", name, path.display());
        Ok(path)
    }

    /// Load the key saved under `name`.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.key_path(name)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(WatcherError::KeyNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the file holding the key named `name`.
    pub fn key_path(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\');
        if invalid {
            return Err(WatcherError::InvalidKeyName {
                name: name.to_string(),
            });
        }
        Ok(self.keys_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generated_key_shape() {
        let key = KeyManager::generate().unwrap();
        assert!(key.starts_with(KEY_PREFIX));
        let hex_part = &key[KEY_PREFIX.len()..];
        assert_eq!(hex_part.len(), KEY_BYTES * 2);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(KeyManager::generate().unwrap(), KeyManager::generate().unwrap());
    }

    #[test]
    fn save_and_load() {
        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path().join("keys"));

        manager.save("default", "watcher_abc").unwrap();

        assert_eq!(manager.load("default").unwrap(), "watcher_abc");
    }

    #[test]
    fn save_overwrites() {
        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path());

        manager.save("default", "old").unwrap();
        manager.save("default", "new").unwrap();

        assert_eq!(manager.load("default").unwrap(), "new");
    }

    #[test]
    fn load_missing_key() {
        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path());
        assert!(matches!(
            manager.load("nope").unwrap_err(),
            WatcherError::KeyNotFound
        ));
    }

    #[test]
    fn load_trims_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path());
        fs::write(temp.path().join("default"), "watcher_abc\n").unwrap();

        assert_eq!(manager.load("default").unwrap(), "watcher_abc");
        assert_eq!(
            manager.key_path("default").unwrap(),
            temp.path().join("default")
        );
    }

    #[test]
    fn rejects_path_like_names() {
        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path());

        for name in ["../escape", "a/b", "..", "", "a\\b"] {
            let err = manager.save(name, "k").unwrap_err();
            assert!(
                matches!(err, WatcherError::InvalidKeyName { .. }),
                "{} should be rejected",
                name
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let manager = KeyManager::new(temp.path());
        let path = manager.save("default", "k").unwrap();

        let mode = fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
