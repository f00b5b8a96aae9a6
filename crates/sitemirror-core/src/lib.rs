//! Domain layer for SiteMirror.
//!
//! Holds the data model, the error taxonomy, the session storage trait and
//! the HTML decoders. Nothing in this crate performs I/O.

pub mod config;
pub mod decode;
pub mod error;
pub mod mirror;
pub mod session;
pub mod validation;

// Re-export common error type
pub use error::{MirrorError, Result};
