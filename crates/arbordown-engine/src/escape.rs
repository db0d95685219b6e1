//! Escaping helpers for markup output.
//!
//! These are stateless text-to-text functions; the HTML renderer composes
//! them, and they are exported for hosts that assemble markup by hand.

/// Escape text for use as HTML element content.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape text for use inside a double-quoted HTML attribute value.
pub fn escape_attribute(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Escape a URL for use in an `href` or `src` attribute.
///
/// Percent-encodes bytes that are unsafe in URLs and entity-escapes the
/// few characters that are additionally unsafe in attribute context.
pub fn escape_href(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    pulldown_cmark_escape::escape_href(&mut out, text)
        .expect("writing to a String is infallible");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_entities() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html("5 > 3"), "5 &gt; 3");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_escape_attribute_quotes() {
        let escaped = escape_attribute("say \"hi\" & bye");
        assert!(escaped.contains("&quot;"));
        assert!(escaped.contains("&amp;"));
        assert!(!escaped.contains('"'));
    }

    #[test]
    fn test_escape_href_spaces_and_amp() {
        assert_eq!(escape_href("foo bar"), "foo%20bar");
        assert_eq!(escape_href("a?b=1&c=2"), "a?b=1&amp;c=2");
        assert_eq!(escape_href("https://example.com/x"), "https://example.com/x");
    }
}
