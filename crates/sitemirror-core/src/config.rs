//! Client configuration model.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2:5000";
pub const DEFAULT_SESSION_COOKIE: &str = "session";
pub const DEFAULT_CHAT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_BASE_SITE: &str = "https://sites.google.com/view/uzakbaevnurzhan";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for talking to one mirror server.
///
/// Every field has a default so a partial `config.toml` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the mirror server, without a trailing slash.
    pub base_url: String,
    /// Name of the server's session cookie that carries the token.
    pub session_cookie_name: String,
    /// Seconds between chat refreshes.
    pub chat_poll_interval_secs: u64,
    /// Site shown on the home screen when the server does not name it.
    pub base_site: String,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            chat_poll_interval_secs: DEFAULT_CHAT_POLL_INTERVAL_SECS,
            base_site: DEFAULT_BASE_SITE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Base URL with trailing slashes removed, ready for `format!("{base}{path}")`.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    /// Poll interval clamped to at least one second.
    pub fn chat_poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.chat_poll_interval_secs.max(1))
    }
}
