use serde::{Deserialize, Serialize};
use std::fmt;

/// A URL identifying a mirrored page.
///
/// Page references have no identity beyond the URL and are recomputed on
/// every list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageReference(String);

impl PageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match against the URL.
    pub fn matches(&self, query: &str) -> bool {
        self.0.to_lowercase().contains(&query.to_lowercase())
    }
}

impl fmt::Display for PageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PageReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for PageReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Filters pages by a free-text query.
///
/// A blank query keeps every page; otherwise pages whose URL contains the
/// query (ignoring case) are kept in their original order.
pub fn filter_pages(pages: &[PageReference], query: &str) -> Vec<PageReference> {
    let query = query.trim();
    if query.is_empty() {
        return pages.to_vec();
    }
    pages.iter().filter(|page| page.matches(query)).cloned().collect()
}
