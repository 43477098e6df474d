//! API key authentication.
//!
//! The server side keeps the accepted keys in a [`KeyStore`] and checks every
//! request through the [`require_api_key`] middleware. The client side keeps
//! its own keys as plain files managed by [`KeyManager`].

pub mod interceptor;
pub mod key_manager;
pub mod keystore;

pub use interceptor::require_api_key;
pub use key_manager::{KeyManager, KEY_PREFIX};
pub use keystore::{KeyInfo, KeyStore};

/// Decides whether a presented API key is accepted.
pub trait Validator: Send + Sync {
    /// Returns `true` if `candidate` is an accepted key.
    fn validate(&self, candidate: &str) -> bool;
}

/// Shorten a key for display, keeping the first 10 and last 4 characters.
///
/// Keys of 14 characters or fewer are returned unchanged.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 14 {
        return key.to_string();
    }

    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
