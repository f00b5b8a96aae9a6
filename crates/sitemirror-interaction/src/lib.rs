//! HTTP interaction layer for SiteMirror.
//!
//! - [`transport`]: the `HttpTransport` seam and its reqwest implementation
//! - [`session_manager`]: token/user lifecycle over a `SessionStore`
//! - [`api_client`]: generic request operation plus one wrapper per endpoint
//! - [`auth`]: login, logout and optimistic session restore
//! - `testing`: scripted transport for tests (`testing` feature)

pub mod api_client;
pub mod auth;
pub mod session_manager;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use api_client::{ApiClient, ApiPayload, Download, RequestOptions};
pub use auth::{AuthError, AuthService};
pub use session_manager::SessionManager;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, ReqwestTransport};
