//! File-backed session store.
//!
//! Persists the session entries as a flat string table in `session.toml`.

use async_trait::async_trait;
use sitemirror_core::session::SessionStore;
use sitemirror_core::{MirrorError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::atomic_toml::{AtomicTomlError, AtomicTomlFile};
use crate::paths::MirrorPaths;

type Entries = BTreeMap<String, String>;

/// [`SessionStore`] that survives restarts by writing `session.toml`.
///
/// Blocking file I/O runs on tokio's blocking pool. A file that no longer
/// parses reads as empty and is overwritten by the next write.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file: AtomicTomlFile<Entries>,
}

impl FileSessionStore {
    pub fn new(paths: &MirrorPaths) -> Self {
        Self::with_path(paths.session_file())
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    async fn blocking<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(AtomicTomlFile<Entries>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(file))
            .await
            .map_err(|e| MirrorError::internal(format!("Session storage task failed: {e}")))?
    }
}

/// `Ok(None)` when the file is missing; an unparseable file yields an empty
/// table.
fn load_entries(file: &AtomicTomlFile<Entries>) -> Result<Option<Entries>> {
    match file.load() {
        Ok(entries) => Ok(entries),
        Err(AtomicTomlError::Parse(e)) => {
            tracing::warn!("[SessionStore] Ignoring unreadable {:?}: {}", file.path(), e);
            Ok(Some(Entries::new()))
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| {
            let entries = load_entries(&file)?.unwrap_or_default();
            Ok(entries.get(&key).cloned())
        })
        .await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.blocking(move |file| {
            file.update_or_reset(Entries::new(), |entries| {
                entries.insert(key, value);
                Ok(())
            })?;
            Ok(())
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.remove_items(&[key]).await
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.blocking(move |file| {
            if load_entries(&file)?.is_none() {
                return Ok(());
            }
            file.update_or_reset(Entries::new(), |entries| {
                for key in &keys {
                    entries.remove(key);
                }
                Ok(())
            })?;
            Ok(())
        })
        .await
    }
}
