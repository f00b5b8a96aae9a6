use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Role;

/// Result of `GET /check_updates`.
///
/// The server may report either plain counts or the lists of affected
/// URLs; both are reduced to counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateSummary {
    #[serde(default, deserialize_with = "count_or_len")]
    pub changed: u64,
    #[serde(default, deserialize_with = "count_or_len")]
    pub new: u64,
}

impl UpdateSummary {
    pub fn has_updates(&self) -> bool {
        self.changed > 0 || self.new > 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountOrList {
    Count(u64),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

fn count_or_len<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CountOrList::deserialize(deserializer)? {
        CountOrList::Count(n) => n,
        CountOrList::List(items) => items.len() as u64,
        CountOrList::Other(_) => 0,
    })
}

/// Result of `POST /do_update`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub saved: Vec<String>,
}

/// Statistics shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HomeStats {
    pub pages_count: u64,
    pub base_site: String,
}

/// Statistics shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdminStats {
    pub pages_count: u64,
    pub versions_count: u64,
    pub site_size_mb: f64,
}

/// One account listed on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserRecord {
    pub username: String,
    pub role: Role,
    pub created_at: String,
}
