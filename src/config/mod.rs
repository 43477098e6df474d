//! Local configuration: where Watcher keeps its files and which API key a
//! client call uses.
//!
//! Everything lives under the Watcher home directory:
//!
//! ```text
//! $WATCHER_HOME (default ~/.watcher)
//! ├── keys/          client keys, one file per name
//! │   └── default
//! └── server/
//!     └── keys.json  server keystore
//! ```

pub mod credentials;
pub mod paths;

pub use credentials::{resolve_api_key, ApiKeySource, ResolvedApiKey, API_KEY_ENV};
pub use paths::{write_private_file, WatcherPaths, DEFAULT_KEY_NAME, HOME_ENV};
