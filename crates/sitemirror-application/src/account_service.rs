//! Sign-in, sign-out and password change for the current user.

use sitemirror_core::MirrorError;
use sitemirror_core::session::Session;
use sitemirror_core::validation::PasswordChange;
use sitemirror_interaction::{ApiClient, AuthError, AuthService};

use crate::guarded::{ActionOutcome, ConfirmPrompt, Confirmation, Notice, run_guarded};

#[derive(Clone)]
pub struct AccountService {
    client: ApiClient,
    auth: AuthService,
}

impl AccountService {
    pub fn new(client: ApiClient, auth: AuthService) -> Self {
        Self { client, auth }
    }

    /// Signs in after checking that both fields are filled.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(AuthError::Rejected(
                "Please enter username and password".to_string(),
            ));
        }
        self.auth.login(username, password).await
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.auth.restore_session().await
    }

    pub async fn change_password(
        &self,
        change: PasswordChange,
        confirmation: &dyn Confirmation,
    ) -> ActionOutcome {
        if let Err(e) = change.validate() {
            return ActionOutcome::Failed(Notice::from_error("Failed to change password", &e));
        }
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Change password", "Change your password?", "Change"),
            "Failed to change password",
            || {
                self.client
                    .change_password(&change.old_password, &change.new_password)
            },
            |_| Notice::success("Password changed"),
        )
        .await
    }

    pub async fn logout(&self, confirmation: &dyn Confirmation) -> ActionOutcome {
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Sign out", "Are you sure you want to sign out?", "Sign out"),
            "Failed to sign out",
            || async {
                self.auth.logout().await;
                Ok::<_, MirrorError>(())
            },
            |_| Notice::success("Signed out"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarded::{AutoConfirm, AutoDecline};
    use sitemirror_core::config::ClientConfig;
    use sitemirror_core::session::{Role, User};
    use sitemirror_infrastructure::MemorySessionStore;
    use sitemirror_interaction::testing::ScriptedTransport;
    use sitemirror_interaction::{ApiResponse, SessionManager};
    use std::sync::Arc;

    fn service(transport: Arc<ScriptedTransport>) -> (AccountService, SessionManager) {
        let session = SessionManager::new(Arc::new(MemorySessionStore::new()));
        let client = ApiClient::new(transport, session.clone(), &ClientConfig::default());
        (AccountService::new(client.clone(), AuthService::new(client)), session)
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let transport = Arc::new(ScriptedTransport::new());
        let (svc, _) = service(transport.clone());

        let err = svc.login("alice", "   ").await.unwrap_err();
        assert_eq!(err.message(), "Please enter username and password");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_login_then_current_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_response(ApiResponse::new(302).with_location("/").with_set_cookie("session=s1"))
            .push_response(ApiResponse::new(302).with_location("/"));
        let (svc, _) = service(transport);

        svc.login(" alice ", "pw").await.unwrap();
        let session = svc.current_session().await.unwrap();
        assert_eq!(session.user, User::new("alice", Role::User));
    }

    #[tokio::test]
    async fn test_change_password_validation_messages() {
        let transport = Arc::new(ScriptedTransport::new());
        let (svc, _) = service(transport.clone());

        let mismatch = svc
            .change_password(PasswordChange::new("old", "secret1", "secret2"), &AutoConfirm)
            .await;
        assert_eq!(mismatch.notice().unwrap().message, "New passwords do not match");

        let short = svc
            .change_password(PasswordChange::new("old", "abc", "abc"), &AutoConfirm)
            .await;
        assert_eq!(
            short.notice().unwrap().message,
            "New password must be at least 6 characters"
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_change_password_sends_old_and_new() {
        let transport = Arc::new(ScriptedTransport::new());
        let (svc, _) = service(transport.clone());

        let outcome = svc
            .change_password(PasswordChange::new("old", "secret1", "secret1"), &AutoConfirm)
            .await;

        assert!(outcome.is_completed());
        let request = transport.last_request().unwrap();
        assert_eq!(request.body.field("old"), Some("old"));
        assert_eq!(request.body.field("new"), Some("secret1"));
    }

    #[tokio::test]
    async fn test_logout_is_guarded() {
        let transport = Arc::new(ScriptedTransport::new());
        let (svc, session) = service(transport);
        session
            .persist(&Session::new("tok", User::new("alice", Role::User)))
            .await
            .unwrap();

        assert_eq!(svc.logout(&AutoDecline).await, ActionOutcome::Cancelled);
        assert!(session.is_authenticated().await);

        assert!(svc.logout(&AutoConfirm).await.is_completed());
        assert!(!session.is_authenticated().await);
    }
}
