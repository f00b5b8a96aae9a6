use once_cell::sync::Lazy;
use regex::Regex;

use super::HtmlDecoder;
use crate::mirror::PageReference;

static HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]+)""#).expect("valid href regex"));

/// Extracts every `href` target, in document order.
///
/// Used for the pages listing and for search results, which the server
/// renders with the same template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageListDecoder;

impl HtmlDecoder for PageListDecoder {
    type Output = Vec<PageReference>;

    fn decode(&self, html: &str) -> Self::Output {
        HREF.captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| PageReference::new(m.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::filter_pages;

    #[test]
    fn test_decodes_anchor_targets_in_order() {
        let pages = PageListDecoder.decode(r#"<a href="/a">A</a><a href="/b">B</a>"#);
        assert_eq!(pages, vec![PageReference::from("/a"), PageReference::from("/b")]);
        assert_eq!(filter_pages(&pages, "a"), vec![PageReference::from("/a")]);
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(PageListDecoder.decode("").is_empty());
        assert!(PageListDecoder.decode("<a href=>broken</a> href=\"\"").is_empty());
        assert!(PageListDecoder.decode("<<<>>> not html at all").is_empty());
    }

    #[test]
    fn test_server_pages_template() {
        let html = r#"
<div class="card p-3">
  <h4>Страницы (2)</h4>
  <ul>
      <li class="py-1"><a href="/view?page=https%3A//site/a">https://site/a</a> — <a href="/download_page?url=https%3A//site/a">скачать</a></li>
  </ul>
</div>"#;
        let pages = PageListDecoder.decode(html);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].as_str(), "/view?page=https%3A//site/a");
    }
}
