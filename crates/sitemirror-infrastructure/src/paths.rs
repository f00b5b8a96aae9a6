//! Path management for SiteMirror configuration and session files.
//!
//! ```text
//! ~/.config/sitemirror/        # Config directory (platform config dir)
//! ├── config.toml              # ClientConfig
//! └── session.toml             # authToken + userData
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "sitemirror";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file SiteMirror reads or writes.
///
/// Tests pass an explicit base directory; production code uses the
/// platform config directory.
#[derive(Debug, Clone)]
pub struct MirrorPaths {
    root: PathBuf,
}

impl MirrorPaths {
    /// Uses `base` as the root directory when given, else `<config_dir>/sitemirror`.
    pub fn new(base: Option<&Path>) -> Result<Self, PathError> {
        let root = match base {
            Some(base) => base.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }
}
