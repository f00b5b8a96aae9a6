use once_cell::sync::Lazy;
use regex::Regex;

use super::{HtmlDecoder, strip_tags};
use crate::mirror::AuditEntry;

static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("valid row regex"));
static CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("valid cell regex"));

/// Decodes the audit table.
///
/// The first matched row is always the header and is dropped. Rows with
/// fewer than four cells are skipped; extra cells are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogDecoder;

impl HtmlDecoder for AuditLogDecoder {
    type Output = Vec<AuditEntry>;

    fn decode(&self, html: &str) -> Self::Output {
        ROW.captures_iter(html)
            .skip(1)
            .filter_map(|row| {
                let body = row.get(1)?.as_str();
                let cells: Vec<String> = CELL
                    .captures_iter(body)
                    .filter_map(|c| c.get(1))
                    .map(|m| strip_tags(m.as_str()))
                    .collect();
                if cells.len() < 4 {
                    return None;
                }
                let mut cells = cells.into_iter();
                Some(AuditEntry {
                    timestamp: cells.next()?,
                    user: cells.next()?,
                    action: cells.next()?,
                    details: cells.next()?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
<table>
  <tr><th>Time</th><th>User</th><th>Action</th><th>Details</th></tr>
  <tr class="odd"><td>2024-05-01T10:00:00</td><td><b>alice</b></td><td>login</td><td>successful</td></tr>
  <tr><td>2024-05-01T10:05:00</td><td>bob</td><td>create_user</td><td>
      carol
  </td></tr>
  <tr><td>2024-05-01T10:06:00</td><td>bob</td><td>logout</td><td></td></tr>
</table>"#;

    #[test]
    fn test_header_excluded_and_order_kept() {
        let entries = AuditLogDecoder.decode(TABLE);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].user, "alice");
        assert_eq!(entries[0].action, "login");
        assert_eq!(entries[1].details, "carol");
        assert_eq!(entries[2].action, "logout");
        assert_eq!(entries[2].details, "");
    }

    #[test]
    fn test_short_rows_skipped() {
        let html = "<tr><th>h</th></tr><tr><td>1</td><td>2</td></tr><tr><td>a</td><td>b</td><td>c</td><td>d</td><td>e</td></tr>";
        let entries = AuditLogDecoder.decode(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "d");
    }

    #[test]
    fn test_header_only_and_garbage() {
        assert!(AuditLogDecoder.decode("<tr><th>only header</th></tr>").is_empty());
        assert!(AuditLogDecoder.decode("").is_empty());
        assert!(AuditLogDecoder.decode("<tr><td>unterminated").is_empty());
    }
}
