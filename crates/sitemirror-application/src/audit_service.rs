use sitemirror_core::Result;
use sitemirror_core::decode::{AuditLogDecoder, HtmlDecoder};
use sitemirror_core::mirror::{AuditEntry, AuditSummary};
use sitemirror_interaction::ApiClient;

/// Audit log in server order, plus the counters shown above it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditReport {
    pub entries: Vec<AuditEntry>,
    pub summary: AuditSummary,
}

#[derive(Clone)]
pub struct AuditService {
    client: ApiClient,
}

impl AuditService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn load(&self) -> Result<AuditReport> {
        let html = self.client.get_audit().await?;
        let entries = AuditLogDecoder.decode(&html);
        let summary = AuditSummary::from_entries(&entries);
        tracing::debug!("[Audit] Loaded {} entries", entries.len());
        Ok(AuditReport { entries, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemirror_core::config::ClientConfig;
    use sitemirror_core::mirror::ActionCategory;
    use sitemirror_infrastructure::MemorySessionStore;
    use sitemirror_interaction::testing::ScriptedTransport;
    use sitemirror_interaction::{ApiResponse, SessionManager};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_skips_header_and_counts_users() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(ApiResponse::html(
            200,
            r#"<table>
              <tr><th>Время</th><th>Пользователь</th><th>Действие</th><th>Детали</th></tr>
              <tr><td>2024-05-01T10:00:00</td><td>admin</td><td>login</td><td>successful</td></tr>
              <tr><td>2024-05-01T10:05:00</td><td>alice</td><td>create_user</td><td>bob (user)</td></tr>
              <tr><td>2024-05-01T10:06:00</td><td>admin</td><td>logout</td><td></td></tr>
            </table>"#,
        ));
        let session = SessionManager::new(Arc::new(MemorySessionStore::new()));
        let client = ApiClient::new(transport, session, &ClientConfig::default());

        let report = AuditService::new(client).load().await.unwrap();

        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[1].user, "alice");
        assert_eq!(report.entries[1].category(), ActionCategory::Create);
        assert_eq!(
            report.summary,
            AuditSummary {
                entries: 3,
                distinct_users: 2
            }
        );
    }
}
