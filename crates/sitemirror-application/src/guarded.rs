//! Guarded actions: confirm, dispatch, report.
//!
//! Every mutating action asks a [`Confirmation`] before anything is sent
//! and finishes with a transient [`Notice`]. Errors never escape a guarded
//! action; they become `ActionOutcome::Failed`.

use async_trait::async_trait;
use serde::Serialize;
use sitemirror_core::{MirrorError, Result};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short message shown after an action completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    /// Error notice for a failed request.
    ///
    /// Validation errors already read as user text and are shown verbatim;
    /// anything else is reported with `fallback` plus the cause.
    pub fn from_error(fallback: &str, error: &MirrorError) -> Self {
        match error {
            MirrorError::Validation(message) => Self::error(message.clone()),
            MirrorError::Unauthorized => {
                Self::error(format!("{fallback}: session expired, please sign in again"))
            }
            other => Self::error(format!("{fallback}: {other}")),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Completed(Notice),
    Failed(Notice),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed(_))
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ActionOutcome::Cancelled => None,
            ActionOutcome::Completed(notice) | ActionOutcome::Failed(notice) => Some(notice),
        }
    }
}

/// Question put to the user before a mutating action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: &'static str,
    pub message: String,
    /// Label of the accepting choice ("Update", "Clean up", ...).
    pub accept: &'static str,
}

impl ConfirmPrompt {
    pub fn new(title: &'static str, message: impl Into<String>, accept: &'static str) -> Self {
        Self {
            title,
            message: message.into(),
            accept,
        }
    }
}

/// Asks the user to approve an action.
#[async_trait]
pub trait Confirmation: Send + Sync {
    /// Returns `true` to proceed.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Approves everything; for scripted use (`--yes`) and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;

#[async_trait]
impl Confirmation for AutoDecline {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        false
    }
}

/// Runs `action` only if the user confirms `prompt`.
///
/// `success` turns the action's value into the completion notice;
/// `failure` prefixes the error notice.
pub async fn run_guarded<T, F, Fut, S>(
    confirmation: &dyn Confirmation,
    prompt: ConfirmPrompt,
    failure: &str,
    action: F,
    success: S,
) -> ActionOutcome
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
    S: FnOnce(T) -> Notice,
{
    if !confirmation.confirm(&prompt).await {
        tracing::debug!("[Guarded] '{}' cancelled", prompt.title);
        return ActionOutcome::Cancelled;
    }

    match action().await {
        Ok(value) => ActionOutcome::Completed(success(value)),
        Err(e) => {
            tracing::error!("[Guarded] '{}' failed: {}", prompt.title, e);
            ActionOutcome::Failed(Notice::from_error(failure, &e))
        }
    }
}
