use once_cell::sync::Lazy;
use regex::Regex;

use super::{HtmlDecoder, strip_tags};
use crate::mirror::ChatMessage;

const UNKNOWN_USER: &str = "Unknown";

static MESSAGE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*class="[^"]*message[^"]*"[^>]*>(.*?)</div>"#)
        .expect("valid message regex")
});
static AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:strong|b)(?:\s[^>]*)?>([^<]+)</(?:strong|b)>").expect("valid author regex")
});
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<small(?:\s[^>]*)?>([^<]+)</small>").expect("valid time regex"));
static INNER_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<div[^>]*>([^<]+)</div>").expect("valid text regex"));
static AUTHOR_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(?:strong|b)(?:\s[^>]*)?>.*?</(?:strong|b)>").expect("valid element regex")
});
static TIME_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<small(?:\s[^>]*)?>.*?</small>").expect("valid element regex"));

/// Decodes the chat page into messages, oldest first as rendered.
///
/// Every call assigns fresh ids, so two decodes of the same page are not
/// comparable by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatDecoder;

impl ChatDecoder {
    fn decode_block(block: &str, inner: &str) -> ChatMessage {
        let user = AUTHOR
            .captures(inner)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let timestamp = TIME
            .captures(inner)
            .and_then(|c| c.get(1))
            .map(|m| unwrap_parens(m.as_str().trim()).to_string())
            .unwrap_or_default();

        let text = INNER_TEXT
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| {
                let without_author = AUTHOR_ELEMENT.replace_all(inner, "");
                let without_time = TIME_ELEMENT.replace_all(&without_author, "");
                strip_tags(&without_time)
                    .trim_start_matches(':')
                    .trim()
                    .to_string()
            });

        ChatMessage::new(user, timestamp, text)
    }
}

impl HtmlDecoder for ChatDecoder {
    type Output = Vec<ChatMessage>;

    fn decode(&self, html: &str) -> Self::Output {
        MESSAGE_BLOCK
            .captures_iter(html)
            .filter_map(|caps| {
                let block = caps.get(0)?.as_str();
                let inner = caps.get(1)?.as_str();
                Some(Self::decode_block(block, inner))
            })
            .collect()
    }
}

fn unwrap_parens(value: &str) -> &str {
    value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_inner_text_div() {
        let html = r#"<div class="chat-message own"><strong> alice </strong><small>12:00</small><div>hello there</div></div>"#;
        let messages = ChatDecoder.decode(html);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user, "alice");
        assert_eq!(messages[0].timestamp, "12:00");
        assert_eq!(messages[0].text, "hello there");
    }

    #[test]
    fn test_inline_message_layout() {
        let html = r#"<div class="message"><b>bob</b> <small class="small-muted">(2024-05-01T10:00:00)</small>: see you</div>
<div class="message"><b>carol</b> <small>(now)</small>: <i>bye</i></div>"#;
        let messages = ChatDecoder.decode(html);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].user, "bob");
        assert_eq!(messages[0].timestamp, "2024-05-01T10:00:00");
        assert_eq!(messages[0].text, "see you");
        assert_eq!(messages[1].text, "bye");
    }

    #[test]
    fn test_missing_author_defaults_to_unknown() {
        let messages = ChatDecoder.decode(r#"<div class="message">anonymous note</div>"#);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user, "Unknown");
        assert_eq!(messages[0].timestamp, "");
        assert_eq!(messages[0].text, "anonymous note");
    }

    #[test]
    fn test_ids_regenerated_per_decode() {
        let html = r#"<div class="message"><b>a</b>: x</div>"#;
        let first = ChatDecoder.decode(html);
        let second = ChatDecoder.decode(html);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_no_messages() {
        assert!(ChatDecoder.decode("").is_empty());
        assert!(ChatDecoder.decode(r#"<div class="mb-2"><b>x</b></div>"#).is_empty());
    }
}
