//! Mirror domain models.
//!
//! Typed view data produced from the server's responses: page references,
//! audit entries, chat messages and the various statistics blocks.

mod audit;
mod chat;
mod page;
mod stats;

pub use audit::{ActionCategory, AuditEntry, AuditSummary};
pub use chat::ChatMessage;
pub use page::{PageReference, filter_pages};
pub use stats::{AdminStats, AdminUserRecord, HomeStats, UpdateOutcome, UpdateSummary};
