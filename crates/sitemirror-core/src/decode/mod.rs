//! Decoders turning server-rendered HTML into typed records.
//!
//! The mirror server renders human-oriented pages instead of a data API,
//! so every decoder locates repeated markup patterns and strips tags from
//! the captured groups. Decoders are total: input that does not contain the
//! expected pattern yields an empty list or zero values, never an error.
//! Entities such as `&amp;` are left as-is.
//!
//! Callers depend on [`HtmlDecoder`] rather than on the regex details, so a
//! structured endpoint can replace any decoder without touching them.

mod audit;
mod chat;
mod pages;
mod stats;

use once_cell::sync::Lazy;
use regex::Regex;

pub use audit::AuditLogDecoder;
pub use chat::ChatDecoder;
pub use pages::PageListDecoder;
pub use stats::{AdminStatsDecoder, AdminUsersDecoder, HomeStatsDecoder};

/// A pure function from an HTML fragment to structured data.
pub trait HtmlDecoder {
    type Output;

    fn decode(&self, html: &str) -> Self::Output;
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Removes every markup tag and trims surrounding whitespace.
pub fn strip_tags(fragment: &str) -> String {
    TAG.replace_all(fragment, "").trim().to_string()
}

/// Base-10 integer from the first capture group, 0 when absent or malformed.
pub(crate) fn capture_u64(re: &Regex, html: &str) -> u64 {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Float from the first capture group, 0.0 when absent or malformed.
pub(crate) fn capture_f64(re: &Regex, html: &str) -> f64 {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}
