//! Storage layer for atomic file operations.

mod atomic_toml;
mod file_session_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use file_session_store::FileSessionStore;
