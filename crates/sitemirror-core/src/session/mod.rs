//! Session domain module.
//!
//! This module contains the authenticated-session model and the storage
//! abstraction it is persisted through.
//!
//! # Module Structure
//!
//! - `model`: Session, User and Role domain models
//! - `store`: Key/value persistence trait for the two session entries
//!
//! # Usage
//!
//! ```ignore
//! use sitemirror_core::session::{Session, SessionStore, User, Role};
//! ```

mod model;
mod store;

// Re-export public API
pub use model::{Role, Session, User};
pub use store::{AUTH_TOKEN_KEY, SessionStore, USER_DATA_KEY};
