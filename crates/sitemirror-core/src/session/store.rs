//! Session storage trait.
//!
//! Defines the key/value interface the session token and user record are
//! persisted through.

use crate::error::Result;
use async_trait::async_trait;

/// Key holding the opaque bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the user record serialized as JSON text.
pub const USER_DATA_KEY: &str = "userData";

/// An abstract string key/value store that survives process restarts.
///
/// Only two keys are ever written ([`AUTH_TOKEN_KEY`] and
/// [`USER_DATA_KEY`]) and they are always cleared together.
///
/// # Implementation Notes
///
/// Implementations must be safe to share between concurrent callers:
/// every outgoing request reads the token once at dispatch time while a
/// logout may be clearing it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Entry present
    /// - `Ok(None)`: Entry absent
    /// - `Err(_)`: Storage could not be read
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Writes an entry, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes an entry. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes several entries in one step.
    ///
    /// The default implementation removes them one by one; file-backed
    /// stores override it to write once.
    async fn remove_items(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove_item(key).await?;
        }
        Ok(())
    }
}
