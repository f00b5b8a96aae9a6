//! Browsing the mirror: home, page list, viewer, updates, downloads, search.

use sitemirror_core::Result;
use sitemirror_core::decode::{HomeStatsDecoder, HtmlDecoder, PageListDecoder};
use sitemirror_core::mirror::{HomeStats, PageReference, UpdateSummary, filter_pages};
use sitemirror_interaction::{ApiClient, Download};
use std::path::{Path, PathBuf};

use crate::guarded::{ActionOutcome, ConfirmPrompt, Confirmation, Notice, run_guarded};

/// Data behind the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeOverview {
    pub stats: HomeStats,
    pub updates: UpdateSummary,
}

#[derive(Clone)]
pub struct MirrorService {
    client: ApiClient,
    home_decoder: HomeStatsDecoder,
}

impl MirrorService {
    pub fn new(client: ApiClient, base_site: impl Into<String>) -> Self {
        Self {
            client,
            home_decoder: HomeStatsDecoder::new(base_site),
        }
    }

    /// Home stats and pending updates, fetched concurrently.
    pub async fn home(&self) -> Result<HomeOverview> {
        let (home, updates) = tokio::join!(self.client.get_home(), self.client.check_updates());
        Ok(HomeOverview {
            stats: self.home_decoder.decode(&home?),
            updates: updates?,
        })
    }

    /// Every mirrored page, in server order.
    pub async fn pages(&self) -> Result<Vec<PageReference>> {
        let html = self.client.get_pages().await?;
        Ok(PageListDecoder.decode(&html))
    }

    /// Pages whose URL contains `query`, ignoring case. A blank query keeps all.
    pub async fn find_pages(&self, query: &str) -> Result<Vec<PageReference>> {
        Ok(filter_pages(&self.pages().await?, query))
    }

    /// Viewer HTML for one page.
    pub async fn view(&self, page: &PageReference) -> Result<String> {
        self.client.get_page(page.as_str()).await
    }

    /// Stored source of one page.
    pub async fn raw(&self, page: &PageReference) -> Result<String> {
        self.client.get_raw_page(page.as_str()).await
    }

    /// Server-side search; results are page links.
    pub async fn search(&self, query: &str) -> Result<Vec<PageReference>> {
        let html = self.client.search(query).await?;
        Ok(PageListDecoder.decode(&html))
    }

    pub async fn check_updates(&self) -> Result<UpdateSummary> {
        self.client.check_updates().await
    }

    pub async fn apply_updates(&self, confirmation: &dyn Confirmation) -> ActionOutcome {
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Update", "Apply updates?", "Update"),
            "Failed to apply updates",
            || self.client.do_update(),
            |outcome| {
                if outcome.msg.is_empty() {
                    Notice::success("Updates applied")
                } else {
                    Notice::success(outcome.msg)
                }
            },
        )
        .await
    }

    /// Downloads one stored page into `dest_dir`.
    pub async fn download_page(
        &self,
        page: &PageReference,
        dest_dir: &Path,
        confirmation: &dyn Confirmation,
    ) -> ActionOutcome {
        run_guarded(
            confirmation,
            ConfirmPrompt::new("Download", format!("Download {page}?"), "Download"),
            "Failed to download page",
            || async {
                let download = self.client.download_page(page.as_str()).await?;
                save_download(&download, dest_dir).await
            },
            |path| Notice::success(format!("Page saved to {}", path.display())),
        )
        .await
    }
}

/// Writes a download under `dest_dir`, keeping only the file-name part of
/// the server-provided name.
pub(crate) async fn save_download(download: &Download, dest_dir: &Path) -> Result<PathBuf> {
    let name = Path::new(&download.file_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "download".into());
    tokio::fs::create_dir_all(dest_dir).await?;
    let path = dest_dir.join(name);
    tokio::fs::write(&path, &download.bytes).await?;
    tracing::info!("[Mirror] Saved {} bytes to {:?}", download.bytes.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarded::{AutoConfirm, AutoDecline, NoticeKind};
    use serde_json::json;
    use sitemirror_core::MirrorError;
    use sitemirror_core::config::ClientConfig;
    use sitemirror_infrastructure::MemorySessionStore;
    use sitemirror_interaction::testing::ScriptedTransport;
    use sitemirror_interaction::{ApiResponse, SessionManager};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn service(transport: Arc<ScriptedTransport>) -> MirrorService {
        let session = SessionManager::new(Arc::new(MemorySessionStore::new()));
        let client = ApiClient::new(transport, session, &ClientConfig::default());
        MirrorService::new(client, "https://fallback.site")
    }

    #[tokio::test]
    async fn test_home_combines_stats_and_updates() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_response(ApiResponse::html(200, "<p>Страниц: 42</p>"))
            .push_response(ApiResponse::json(200, &json!({"changed": 1, "new": 0})));
        let overview = service(transport.clone()).home().await.unwrap();

        assert_eq!(overview.stats.pages_count, 42);
        assert_eq!(overview.stats.base_site, "https://fallback.site");
        assert!(overview.updates.has_updates());
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_home_fails_when_either_request_fails() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_response(ApiResponse::html(200, "Страниц: 1"))
            .push_response(ApiResponse::html(500, ""));
        let err = service(transport).home().await.unwrap_err();
        assert!(err.is_http() || err.is_connectivity());
    }

    #[tokio::test]
    async fn test_find_pages_filters_case_insensitively() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ApiResponse::html(
            200,
            r#"<a href="/About">About</a><a href="/news">News</a>"#,
        ));
        let pages = service(transport).find_pages("about").await.unwrap();
        assert_eq!(pages, vec![PageReference::new("/About")]);
    }

    #[tokio::test]
    async fn test_search_decodes_links() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ApiResponse::html(200, r#"<li><a href="/view?url=x">x</a></li>"#));
        let svc = service(transport.clone());

        let results = svc.search("x").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(transport.last_request().unwrap().query_value("q"), Some("x"));
    }

    #[tokio::test]
    async fn test_apply_updates_is_guarded() {
        let transport = Arc::new(ScriptedTransport::new());
        let svc = service(transport.clone());

        assert_eq!(svc.apply_updates(&AutoDecline).await, ActionOutcome::Cancelled);
        assert!(transport.requests().is_empty());

        transport.push_response(ApiResponse::json(200, &json!({"ok": true, "msg": "Обновлено 2 элементов."})));
        let outcome = svc.apply_updates(&AutoConfirm).await;
        assert_eq!(outcome.notice().unwrap().message, "Обновлено 2 элементов.");
    }

    #[tokio::test]
    async fn test_apply_updates_failure_notice() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_error(MirrorError::connectivity("refused"));
        let outcome = service(transport).apply_updates(&AutoConfirm).await;
        assert_eq!(outcome.notice().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_download_page_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(
            ApiResponse::new(200)
                .with_content_disposition("attachment; filename=\"../intro.html\"")
                .with_body(b"<html>intro</html>".to_vec()),
        );
        let page = PageReference::new("https://site/intro");

        let outcome = service(transport)
            .download_page(&page, temp_dir.path(), &AutoConfirm)
            .await;

        assert!(outcome.is_completed());
        let saved = std::fs::read_to_string(temp_dir.path().join("intro.html")).unwrap();
        assert_eq!(saved, "<html>intro</html>");
    }
}
