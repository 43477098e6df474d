//! Watcher home directory layout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::auth::KeyManager;

/// Environment variable that overrides the Watcher home directory.
pub const HOME_ENV: &str = "WATCHER_HOME";

/// Name of the client key used when none is given.
pub const DEFAULT_KEY_NAME: &str = "default";

/// Resolved locations of Watcher's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherPaths {
    home: PathBuf,
}

impl WatcherPaths {
    /// Use an explicit home directory.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Discover the home directory from `$WATCHER_HOME`, falling back to
    /// `~/.watcher`.
    pub fn discover() -> Self {
        Self::resolve(
            std::env::var_os(HOME_ENV).map(PathBuf::from),
            dirs::home_dir(),
        )
    }

    fn resolve(env_home: Option<PathBuf>, user_home: Option<PathBuf>) -> Self {
        if let Some(home) = env_home.filter(|p| !p.as_os_str().is_empty()) {
            return Self::at(home);
        }
        let base = user_home.unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join(".watcher"))
    }

    /// The Watcher home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding client key files.
    pub fn keys_dir(&self) -> PathBuf {
        self.home.join("keys")
    }

    /// Client key files under [`Self::keys_dir`].
    pub fn key_manager(&self) -> KeyManager {
        KeyManager::new(self.keys_dir())
    }

    /// The server keystore file.
    pub fn server_keystore(&self) -> PathBuf {
        self.home.join("server").join("keys.json")
    }
}

/// Write `contents` to `path`, readable only by the owner on unix.
///
/// Parent directories are created as needed. An existing file is truncated
/// and its mode reset to 0600.
pub fn write_private_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // mode() only applies on creation
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)?;
        file.sync_all()
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
    }
}
