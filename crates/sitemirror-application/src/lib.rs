//! Application layer for SiteMirror.
//!
//! Use cases shared by every front-end. Components receive an
//! [`AppContext`] instead of reaching for global state, and every mutating
//! action goes through [`guarded::run_guarded`].

pub mod account_service;
pub mod admin_service;
pub mod audit_service;
pub mod chat;
pub mod context;
pub mod guarded;
pub mod mirror_service;

pub use account_service::AccountService;
pub use admin_service::{AdminDashboard, AdminService};
pub use audit_service::{AuditReport, AuditService};
pub use chat::{ChatFeed, ChatPollHandle, ChatPoller, ChatService};
pub use context::AppContext;
pub use guarded::{
    ActionOutcome, AutoConfirm, AutoDecline, ConfirmPrompt, Confirmation, Notice, NoticeKind,
};
pub use mirror_service::{HomeOverview, MirrorService};
