//! Plain-text helpers: HTML stripping, truncation and URL-component decoding.

/// Elements whose content is never visible text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Elements that start or end a visual line.
const LINE_BREAK_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote",
    "figure", "pre", "hr",
];

/// Reduces an HTML fragment to its text content.
///
/// Tags are dropped, entities decoded, block boundaries become line breaks and
/// every line is trimmed. A `<` that does not open a tag is kept as text.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut skipping: Option<String> = None;
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        let (before, tail) = rest.split_at(start);
        if skipping.is_none() {
            text.push_str(before);
        }

        if let Some(comment) = tail.strip_prefix("<!--") {
            // An unterminated comment runs to the end of the input.
            rest = comment.find("-->").map_or("", |close| &comment[close + 3..]);
            continue;
        }

        let Some(end) = tail.find('>') else {
            if skipping.is_none() {
                text.push_str(tail);
            }
            rest = "";
            break;
        };

        let inner = &tail[1..end];
        if !opens_tag(inner) {
            if skipping.is_none() {
                text.push('<');
            }
            rest = &tail[1..];
            continue;
        }

        let closing = inner.starts_with('/');
        let name = tag_name(inner);
        if skipping.is_some() {
            if closing && skipping.as_deref() == Some(name.as_str()) {
                skipping = None;
            }
        } else if !closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            skipping = Some(name);
        } else if LINE_BREAK_ELEMENTS.contains(&name.as_str()) {
            text.push('\n');
        }
        rest = &tail[end + 1..];
    }
    if skipping.is_none() {
        text.push_str(rest);
    }

    let decoded = html_escape::decode_html_entities(&text);
    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn opens_tag(inner: &str) -> bool {
    inner
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

fn tag_name(inner: &str) -> String {
    inner
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// First `max` characters of `text`, with `...` appended when anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Decodes `%XX` escapes the way `decodeURIComponent` does.
///
/// Returns `None` for a malformed escape or when the bytes are not UTF-8.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
