//! Login, logout and session restore.
//!
//! Login never fails with a [`MirrorError`](sitemirror_core::MirrorError);
//! every failure becomes an [`AuthError`] carrying the text to show the user.

use reqwest::Method;
use sitemirror_core::session::{Role, Session, User};
use thiserror::Error;

use crate::api_client::ApiClient;
use crate::session_manager::SessionManager;
use crate::transport::{ApiRequest, ApiResponse, RequestBody};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const CONNECTION_FAILED: &str = "Unable to connect to the server";

/// Why a login did not produce a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server answered and refused the credentials.
    #[error("{0}")]
    Rejected(String),

    /// No response arrived.
    #[error("{0}")]
    Connectivity(String),

    /// Login succeeded but the session could not be stored locally.
    #[error("{0}")]
    Storage(String),
}

impl AuthError {
    /// User-facing message.
    pub fn message(&self) -> &str {
        match self {
            AuthError::Rejected(msg) | AuthError::Connectivity(msg) | AuthError::Storage(msg) => {
                msg
            }
        }
    }
}

/// Login/logout front door over [`ApiClient`] and [`SessionManager`].
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &SessionManager {
        self.client.session()
    }

    /// Signs in and persists the resulting session.
    ///
    /// The server answers a good login with a redirect away from `/login`
    /// and a session cookie; that cookie becomes the token. The role is
    /// then learned by probing `/admin`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let mut request = ApiRequest::new(Method::POST, self.client.url("/login"));
        request.body = RequestBody::form([("username", username), ("password", password)]);
        request.follow_redirects = false;

        let response = self.client.send_raw(request).await.map_err(|e| {
            tracing::error!("[Auth] Login request failed: {}", e);
            AuthError::Connectivity(CONNECTION_FAILED.to_string())
        })?;

        let Some(token) = self.accepted_token(&response) else {
            tracing::info!("[Auth] Login rejected for {} (status {})", username, response.status);
            return Err(AuthError::Rejected(INVALID_CREDENTIALS.to_string()));
        };

        let role = self.probe_role(&token).await;
        let session = Session::new(token, User::new(username, role));

        self.session().persist(&session).await.map_err(|e| {
            tracing::error!("[Auth] Failed to store session: {}", e);
            AuthError::Storage(format!("Failed to save session: {e}"))
        })?;

        tracing::info!("[Auth] Logged in as {} ({})", username, role);
        Ok(session)
    }

    fn accepted_token(&self, response: &ApiResponse) -> Option<String> {
        if !(response.is_success() || response.is_redirect()) {
            return None;
        }
        if response
            .location
            .as_deref()
            .is_some_and(|location| location.contains("/login"))
        {
            return None;
        }
        response.cookie(self.client.cookie_name())
    }

    /// `/admin` answers 200 only for administrators; everyone else is
    /// redirected. Any failure here degrades to [`Role::User`].
    async fn probe_role(&self, token: &str) -> Role {
        let mut request = ApiRequest::new(Method::GET, self.client.url("/admin"));
        request.set_header("Authorization", format!("Bearer {token}"));
        request.set_header("Cookie", format!("{}={token}", self.client.cookie_name()));
        request.follow_redirects = false;

        match self.client.send_raw(request).await {
            Ok(response) if response.status == 200 => Role::Admin,
            Ok(_) => Role::User,
            Err(e) => {
                tracing::warn!("[Auth] Role probe failed, assuming user: {}", e);
                Role::User
            }
        }
    }

    /// Clears the stored session. Does not contact the server.
    pub async fn logout(&self) {
        self.session().clear().await;
    }

    /// Session from a previous run, without any network call.
    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.session().restore().await;
        if let Some(session) = &session {
            tracing::debug!("[Auth] Restored session for {}", session.user.username);
        }
        session
    }
}
