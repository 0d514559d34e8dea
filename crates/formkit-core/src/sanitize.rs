//! HTML sanitization for rich-text values shown in read-only mode.

use std::borrow::Cow;
use std::collections::HashSet;

use ammonia::{Builder, UrlRelative};

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "s", "sub", "sup", "h1", "h2", "h3", "h4", "h5",
    "h6", "ul", "ol", "li", "a", "img", "blockquote", "pre", "code", "table", "thead", "tbody",
    "tr", "th", "td", "span", "div",
];

const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title", "class", "target", "rel"];

/// Elements removed together with everything inside them.
const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea",
];

/// Schemes kept in `href`/`src`. Relative URLs always pass; `data:` is
/// narrowed to images by [`filter_url`].
const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "data"];

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Keep a safe subset of HTML: allow-listed tags and attributes, no
/// scripting URLs, no comments. Disallowed tags are unwrapped (their text
/// stays) except for script-like elements, which vanish entirely.
///
/// Attribute values are checked after entity decoding, so encoded or
/// whitespace-split schemes (`&#106;avascript:`, `java&#x09;script:`)
/// are caught like the plain ones.
pub fn sanitize_html(html: &str) -> String {
    sanitizer().clean(html).to_string()
}

fn sanitizer() -> Builder<'static> {
    let mut builder = Builder::empty();
    builder
        .tags(set(ALLOWED_TAGS))
        .generic_attributes(set(ALLOWED_ATTRS))
        .clean_content_tags(set(DROPPED_WITH_CONTENT))
        .url_schemes(set(URL_SCHEMES))
        .link_rel(None)
        .url_relative(UrlRelative::PassThrough)
        .strip_comments(true)
        .attribute_filter(filter_url);
    builder
}

fn set(items: &[&'static str]) -> HashSet<&'static str> {
    items.iter().copied().collect()
}

/// `data:` URLs survive only as image sources.
fn filter_url<'u>(_element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if attribute != "href" && attribute != "src" {
        return Some(value.into());
    }
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if compact.starts_with("data:") && !(attribute == "src" && compact.starts_with("data:image/")) {
        return None;
    }
    Some(value.into())
}
