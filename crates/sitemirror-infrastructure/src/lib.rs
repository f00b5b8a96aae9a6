//! Infrastructure layer for SiteMirror: filesystem paths, atomic TOML
//! persistence, session stores and configuration loading.

pub mod config_service;
pub mod memory_session_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::memory_session_store::MemorySessionStore;
pub use crate::paths::MirrorPaths;
pub use crate::storage::{AtomicTomlError, AtomicTomlFile, FileSessionStore};
