use once_cell::sync::Lazy;
use regex::Regex;

use super::{HtmlDecoder, capture_f64, capture_u64};
use crate::mirror::{AdminStats, AdminUserRecord, HomeStats};
use crate::session::Role;

static PAGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"Страниц:\s*(\d+)").expect("valid pages regex"));
static VERSIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Версий:\s*(\d+)").expect("valid versions regex"));
static SIZE_MB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Размер(?: копии)?:\s*([\d.]+)\s*(?:МБ|MB)").expect("valid size regex")
});
static BASE_SITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Сайт:\s*<b>([^<]+)</b>").expect("valid site regex"));
static USER_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<li>\s*([^<>—]+?)\s*—\s*(user|admin)\s*—\s*([^<>]*?)\s*</li>")
        .expect("valid user item regex")
});

/// Decodes the home page counters.
#[derive(Debug, Clone, Default)]
pub struct HomeStatsDecoder {
    fallback_base_site: String,
}

impl HomeStatsDecoder {
    /// `fallback_base_site` is reported when the page does not name the site.
    pub fn new(fallback_base_site: impl Into<String>) -> Self {
        Self {
            fallback_base_site: fallback_base_site.into(),
        }
    }
}

impl HtmlDecoder for HomeStatsDecoder {
    type Output = HomeStats;

    fn decode(&self, html: &str) -> Self::Output {
        let base_site = BASE_SITE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.fallback_base_site.clone());

        HomeStats {
            pages_count: capture_u64(&PAGES, html),
            base_site,
        }
    }
}

/// Decodes the statistics block of the admin page.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminStatsDecoder;

impl HtmlDecoder for AdminStatsDecoder {
    type Output = AdminStats;

    fn decode(&self, html: &str) -> Self::Output {
        AdminStats {
            pages_count: capture_u64(&PAGES, html),
            versions_count: capture_u64(&VERSIONS, html),
            site_size_mb: capture_f64(&SIZE_MB, html),
        }
    }
}

/// Decodes the account list of the admin page (`name — role — created`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminUsersDecoder;

impl HtmlDecoder for AdminUsersDecoder {
    type Output = Vec<AdminUserRecord>;

    fn decode(&self, html: &str) -> Self::Output {
        USER_ITEM
            .captures_iter(html)
            .filter_map(|caps| {
                let role: Role = caps.get(2)?.as_str().parse().ok()?;
                Some(AdminUserRecord {
                    username: caps.get(1)?.as_str().to_string(),
                    role,
                    created_at: caps.get(3)?.as_str().to_string(),
                })
            })
            .collect()
    }
}
