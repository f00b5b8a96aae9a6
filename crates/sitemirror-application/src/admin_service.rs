//! Administrator dashboard and maintenance actions.

use sitemirror_core::Result;
use sitemirror_core::decode::{AdminStatsDecoder, AdminUsersDecoder, HtmlDecoder};
use sitemirror_core::mirror::{AdminStats, AdminUserRecord};
use sitemirror_core::validation::NewUser;
use sitemirror_interaction::ApiClient;
use std::path::Path;

use crate::guarded::{ActionOutcome, ConfirmPrompt, Confirmation, Notice, run_guarded};
use crate::mirror_service::save_download;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub users: Vec<AdminUserRecord>,
}

#[derive(Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        let html = self.client.get_admin().await?;
        Ok(AdminDashboard {
            stats: AdminStatsDecoder.decode(&html),
            users: AdminUsersDecoder.decode(&html),
        })
    }

    /// Validates the form locally, then creates the account.
    pub async fn create_user(&self, user: NewUser, confirmation: &dyn Confirmation) -> ActionOutcome {
        if let Err(e) = user.validate() {
            return ActionOutcome::Failed(Notice::from_error("Failed to create user", &e));
        }
        let username = user.username.trim().to_string();
        run_guarded(
            confirmation,
            ConfirmPrompt::new(
                "Create user",
                format!("Create {} '{}'?", user.role.label().to_lowercase(), username),
                "Create",
            ),
            "Failed to create user",
            || self.client.create_user(&username, &user.password, user.role),
            |_| Notice::success("User created"),
        )
        .await
    }

    pub async fn cleanup(&self, confirmation: &dyn Confirmation) -> ActionOutcome {
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Cleanup", "Remove old page versions?", "Clean up"),
            "Failed to run cleanup",
            || self.client.cleanup(),
            |_| Notice::success("Cleanup completed"),
        )
        .await
    }

    pub async fn force_crawl(&self, confirmation: &dyn Confirmation) -> ActionOutcome {
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Force crawl", "Start a full re-crawl of the site?", "Crawl"),
            "Failed to start crawl",
            || self.client.force_crawl(),
            |_| Notice::success("Crawl started"),
        )
        .await
    }

    /// Saves the backup archive into `dest_dir`. Read-only, so no prompt.
    pub async fn download_backup(&self, dest_dir: &Path) -> ActionOutcome {
        let result = async {
            let download = self.client.download_backup().await?;
            save_download(&download, dest_dir).await
        }
        .await;

        match result {
            Ok(path) => ActionOutcome::Completed(Notice::success(format!(
                "Backup saved to {}",
                path.display()
            ))),
            Err(e) => {
                tracing::error!("[Admin] Backup download failed: {}", e);
                ActionOutcome::Failed(Notice::from_error("Failed to download backup", &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarded::{AutoConfirm, AutoDecline};
    use sitemirror_core::config::ClientConfig;
    use sitemirror_core::session::Role;
    use sitemirror_infrastructure::MemorySessionStore;
    use sitemirror_interaction::testing::ScriptedTransport;
    use sitemirror_interaction::{ApiResponse, SessionManager};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn service(transport: Arc<ScriptedTransport>) -> AdminService {
        let session = SessionManager::new(Arc::new(MemorySessionStore::new()));
        AdminService::new(ApiClient::new(transport, session, &ClientConfig::default()))
    }

    #[tokio::test]
    async fn test_dashboard_decodes_stats_and_users() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ApiResponse::html(
            200,
            "<p>Страниц: 12</p><p>Версий: 30</p><p>Размер копии: 4.5 МБ</p>\
             <ul><li>admin — admin — 2024-01-01</li><li>alice — user — 2024-02-01</li></ul>",
        ));

        let dashboard = service(transport).dashboard().await.unwrap();

        assert_eq!(dashboard.stats.pages_count, 12);
        assert_eq!(dashboard.stats.versions_count, 30);
        assert!((dashboard.stats.site_size_mb - 4.5).abs() < f64::EPSILON);
        assert_eq!(dashboard.users.len(), 2);
        assert_eq!(dashboard.users[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_create_user_validates_before_sending() {
        let transport = Arc::new(ScriptedTransport::new());
        let svc = service(transport.clone());

        let outcome = svc
            .create_user(NewUser::new("  ", "pw", Role::User), &AutoConfirm)
            .await;

        assert_eq!(outcome.notice().unwrap().message, "Please fill in all fields");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_sends_trimmed_name() {
        let transport = Arc::new(ScriptedTransport::new());
        let svc = service(transport.clone());

        let outcome = svc
            .create_user(NewUser::new(" carol ", "secret", Role::Admin), &AutoConfirm)
            .await;

        assert!(outcome.is_completed());
        let request = transport.last_request().unwrap();
        assert_eq!(request.body.field("username"), Some("carol"));
        assert_eq!(request.body.field("role"), Some("admin"));
    }

    #[tokio::test]
    async fn test_maintenance_actions_respect_confirmation() {
        let transport = Arc::new(ScriptedTransport::new());
        let svc = service(transport.clone());

        assert_eq!(svc.cleanup(&AutoDecline).await, ActionOutcome::Cancelled);
        assert_eq!(svc.force_crawl(&AutoDecline).await, ActionOutcome::Cancelled);
        assert!(transport.requests().is_empty());

        assert!(svc.cleanup(&AutoConfirm).await.is_completed());
        assert!(svc.force_crawl(&AutoConfirm).await.is_completed());
        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://10.0.2.2:5000/admin/cleanup".to_string(),
                "http://10.0.2.2:5000/admin/force_crawl".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_download_backup_saves_archive() {
        let temp_dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ApiResponse::new(200).with_body(vec![0x50, 0x4b]));

        let outcome = service(transport).download_backup(temp_dir.path()).await;

        assert!(outcome.is_completed());
        assert_eq!(std::fs::read(temp_dir.path().join("backup.zip")).unwrap(), vec![0x50, 0x4b]);
    }
}
