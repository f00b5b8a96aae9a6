//! Explicit application context.
//!
//! Built once at startup and handed to every front-end component; there is
//! no process-wide client or session singleton.

use sitemirror_core::Result;
use sitemirror_core::config::ClientConfig;
use sitemirror_core::session::SessionStore;
use sitemirror_infrastructure::{ConfigService, FileSessionStore, MirrorPaths};
use sitemirror_interaction::{ApiClient, AuthService, HttpTransport, ReqwestTransport, SessionManager};
use std::sync::Arc;

use crate::account_service::AccountService;
use crate::admin_service::AdminService;
use crate::audit_service::AuditService;
use crate::chat::{ChatPoller, ChatService};
use crate::mirror_service::MirrorService;

/// Everything a front-end needs to talk to one mirror server.
///
/// Cloning is cheap and clones share the same client and session store.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<ClientConfig>,
    client: ApiClient,
    auth: AuthService,
}

impl AppContext {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let session = SessionManager::new(store);
        let client = ApiClient::new(transport, session, &config);
        tracing::debug!("[AppContext] Using mirror at {}", client.base_url());
        Self {
            config: Arc::new(config),
            auth: AuthService::new(client.clone()),
            client,
        }
    }

    /// Production wiring: config from `config.toml` + environment, session
    /// in `session.toml`, reqwest transport.
    pub fn from_paths(paths: &MirrorPaths) -> Result<Self> {
        let config = ConfigService::new(paths).load()?;
        Self::with_config(paths, config)
    }

    /// Production wiring with an already loaded configuration.
    pub fn with_config(paths: &MirrorPaths, config: ClientConfig) -> Result<Self> {
        let store = Arc::new(FileSessionStore::new(paths));
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(config, store, transport))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn mirror(&self) -> MirrorService {
        MirrorService::new(self.client.clone(), self.config.base_site.clone())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.client.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.client.clone())
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(self.client.clone(), self.auth.clone())
    }

    pub fn chat(&self) -> ChatService {
        ChatService::new(self.client.clone())
    }

    pub fn chat_poller(&self) -> ChatPoller {
        ChatPoller::new(self.chat(), self.config.chat_poll_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemirror_infrastructure::MemorySessionStore;
    use sitemirror_interaction::ApiResponse;
    use sitemirror_interaction::testing::ScriptedTransport;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let transport = Arc::new(ScriptedTransport::new());
        let signed_in = MemorySessionStore::new();
        signed_in.set_item("authToken", "tok").await.unwrap();
        signed_in
            .set_item("userData", r#"{"username":"alice","role":"user"}"#)
            .await
            .unwrap();

        let first = AppContext::new(ClientConfig::default(), Arc::new(signed_in), transport.clone());
        let second = AppContext::new(
            ClientConfig::default(),
            Arc::new(MemorySessionStore::new()),
            transport.clone(),
        );

        assert!(first.auth().restore_session().await.is_some());
        assert!(second.auth().restore_session().await.is_none());

        transport.push_response(ApiResponse::html(200, ""));
        second.client().get_home().await.unwrap();
        assert!(transport.last_request().unwrap().header("Authorization").is_none());
    }

    #[test]
    fn test_with_config_uses_given_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MirrorPaths::new(Some(temp_dir.path())).unwrap();
        let context =
            AppContext::with_config(&paths, ClientConfig::default().with_base_url("http://lan:8000/"))
                .unwrap();
        assert_eq!(context.client().base_url(), "http://lan:8000");
        assert_eq!(context.config().chat_poll_interval_secs, 5);
    }
}
