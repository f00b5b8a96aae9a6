//! ApiClient - the single entry point to the mirror server.
//!
//! One generic request operation handles auth injection, session teardown
//! on 401, status checking and body normalization. Every named endpoint is
//! a thin wrapper that fixes the path, method and body encoding.

use reqwest::Method;
use serde_json::Value;
use sitemirror_core::config::ClientConfig;
use sitemirror_core::mirror::{UpdateOutcome, UpdateSummary};
use sitemirror_core::session::Role;
use sitemirror_core::{MirrorError, Result};
use std::sync::Arc;

use crate::session_manager::SessionManager;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody};

/// Optional overrides for a generic request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Json(Value),
    Text(String),
}

impl ApiPayload {
    /// The body as text; JSON is re-serialized.
    pub fn into_text(self) -> String {
        match self {
            ApiPayload::Text(text) => text,
            ApiPayload::Json(value) => value.to_string(),
        }
    }

    /// The body as JSON; text is parsed, and unparseable text gives `None`.
    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiPayload::Json(value) => Some(value),
            ApiPayload::Text(text) => serde_json::from_str(&text).ok(),
        }
    }
}

/// A file payload (`/download_backup`, `/download_page`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Client for one fixed mirror origin.
///
/// Cheap to clone; clones share the transport and session store. Build it
/// once and hand it to whoever needs it.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionManager,
    base_url: String,
    cookie_name: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: SessionManager,
        config: &ClientConfig,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: config.normalized_base_url(),
            cookie_name: config.session_cookie_name.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub(crate) fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    // ============================================================================
    // Generic request
    // ============================================================================

    /// Issues one request to `endpoint` (relative to the base URL).
    ///
    /// - attaches the token current at dispatch time, if any
    /// - 401: clears the stored session, then fails with `Unauthorized`
    /// - other non-2xx: fails with `Http { status }`
    /// - otherwise JSON when the content type says so, else text
    ///
    /// Exactly one round trip; no retry.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<ApiPayload> {
        let response = self.dispatch(endpoint, options).await?;
        if response.is_json() {
            Ok(ApiPayload::Json(serde_json::from_slice(&response.body)?))
        } else {
            Ok(ApiPayload::Text(String::from_utf8_lossy(&response.body).into_owned()))
        }
    }

    /// Same as [`request`](Self::request) but keeps the raw bytes.
    pub async fn download(
        &self,
        endpoint: &str,
        options: RequestOptions,
        default_name: &str,
    ) -> Result<Download> {
        let response = self.dispatch(endpoint, options).await?;
        let file_name = response
            .content_disposition
            .as_deref()
            .and_then(disposition_file_name)
            .unwrap_or_else(|| default_name.to_string());
        Ok(Download {
            file_name,
            content_type: response.content_type,
            bytes: response.body,
        })
    }

    async fn dispatch(&self, endpoint: &str, options: RequestOptions) -> Result<ApiResponse> {
        let token = self.session.current_token().await;

        let mut request = ApiRequest::new(options.method, self.url(endpoint));
        request.query = options.query;
        request.body = options.body;
        if let Some(token) = &token {
            request.set_header("Authorization", format!("Bearer {token}"));
            request.set_header("Cookie", format!("{}={token}", self.cookie_name));
        }
        for (name, value) in options.headers {
            request.set_header(name, value);
        }

        tracing::debug!("[ApiClient] {} {}", request.method, endpoint);

        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::error!("[ApiClient] {} failed: {}", endpoint, e);
        })?;

        if response.status == 401 {
            tracing::warn!("[ApiClient] {} returned 401, clearing session", endpoint);
            self.session.clear().await;
            return Err(MirrorError::Unauthorized);
        }
        if !response.is_success() {
            tracing::error!("[ApiClient] {} returned status {}", endpoint, response.status);
            return Err(MirrorError::http(response.status));
        }
        Ok(response)
    }

    /// Sends a prepared request with no auth injection and no status handling.
    pub(crate) async fn send_raw(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    async fn text(&self, endpoint: &str, options: RequestOptions) -> Result<String> {
        Ok(self.request(endpoint, options).await?.into_text())
    }

    // ============================================================================
    // Pages
    // ============================================================================

    /// `GET /` - home page HTML.
    pub async fn get_home(&self) -> Result<String> {
        self.text("/", RequestOptions::get()).await
    }

    /// `GET /pages` - pages listing HTML.
    pub async fn get_pages(&self) -> Result<String> {
        self.text("/pages", RequestOptions::get()).await
    }

    /// `GET /view?url=` - page viewer HTML.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        self.text("/view", RequestOptions::get().with_query("url", url))
            .await
    }

    /// `GET /raw?url=` - stored page source.
    pub async fn get_raw_page(&self, url: &str) -> Result<String> {
        self.text("/raw", RequestOptions::get().with_query("url", url))
            .await
    }

    /// `GET /download_page?url=` - stored page as a file.
    pub async fn download_page(&self, url: &str) -> Result<Download> {
        let fallback = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("page.html")
            .to_string();
        self.download(
            "/download_page",
            RequestOptions::get().with_query("url", url),
            &fallback,
        )
        .await
    }

    /// `GET /search?q=` - search results HTML.
    pub async fn search(&self, query: &str) -> Result<String> {
        self.text("/search", RequestOptions::get().with_query("q", query))
            .await
    }

    // ============================================================================
    // Updates and backups
    // ============================================================================

    /// `GET /check_updates` - counts of changed and new pages.
    pub async fn check_updates(&self) -> Result<UpdateSummary> {
        let payload = self.request("/check_updates", RequestOptions::get()).await?;
        Ok(payload
            .into_json()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default())
    }

    /// `POST /do_update` - apply pending updates.
    pub async fn do_update(&self) -> Result<UpdateOutcome> {
        match self.request("/do_update", RequestOptions::post()).await? {
            ApiPayload::Json(value) => Ok(serde_json::from_value(value)?),
            ApiPayload::Text(text) => Ok(UpdateOutcome {
                ok: true,
                msg: text,
                saved: Vec::new(),
            }),
        }
    }

    /// `GET /download_backup` - full mirror backup archive.
    pub async fn download_backup(&self) -> Result<Download> {
        self.download("/download_backup", RequestOptions::get(), "backup.zip")
            .await
    }

    // ============================================================================
    // Audit and chat
    // ============================================================================

    /// `GET /audit` - audit log HTML.
    pub async fn get_audit(&self) -> Result<String> {
        self.text("/audit", RequestOptions::get()).await
    }

    /// `GET /chat` - chat page HTML.
    pub async fn get_chat(&self) -> Result<String> {
        self.text("/chat", RequestOptions::get()).await
    }

    /// `POST /chat_send` with form field `message`.
    pub async fn send_chat_message(&self, message: &str) -> Result<ApiPayload> {
        self.request(
            "/chat_send",
            RequestOptions::post().with_body(RequestBody::form([("message", message)])),
        )
        .await
    }

    // ============================================================================
    // Admin and account
    // ============================================================================

    /// `GET /admin` - admin dashboard HTML.
    pub async fn get_admin(&self) -> Result<String> {
        self.text("/admin", RequestOptions::get()).await
    }

    /// `POST /admin/create_user` with form fields `username`, `password`, `role`.
    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<ApiPayload> {
        self.request(
            "/admin/create_user",
            RequestOptions::post().with_body(RequestBody::form([
                ("username", username),
                ("password", password),
                ("role", role.as_str()),
            ])),
        )
        .await
    }

    /// `POST /admin/cleanup` - drop old page versions.
    pub async fn cleanup(&self) -> Result<ApiPayload> {
        self.request("/admin/cleanup", RequestOptions::post()).await
    }

    /// `POST /admin/force_crawl` - re-crawl the whole site.
    pub async fn force_crawl(&self) -> Result<ApiPayload> {
        self.request("/admin/force_crawl", RequestOptions::post()).await
    }

    /// `POST /change_password` with form fields `old`, `new`.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<ApiPayload> {
        self.request(
            "/change_password",
            RequestOptions::post()
                .with_body(RequestBody::form([("old", old_password), ("new", new_password)])),
        )
        .await
    }
}

/// Extracts `filename` from a `Content-Disposition` header value.
fn disposition_file_name(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = value.trim().trim_matches('"').trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
