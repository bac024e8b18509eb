//! Minimal handling of the inline rich-text markup stored in summaries and
//! highlights (`<b>`, `<i>`, `<ul><li>`, `<div>`, `<br>`).

/// Removes tags and decodes entities, leaving plain text.
///
/// The markup goes through ammonia's HTML5 tokenizer with every tag disallowed,
/// so a literal `<` in prose survives and any named or numeric entity decodes.
/// The serializer re-escapes only `&`, `<`, `>` and no-break spaces.
pub fn strip_html(html: &str) -> String {
    let text = ammonia::Builder::empty().clean(html).to_string();
    text.replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Splits editor markup into list items.
///
/// `<li>` contents win when present. Otherwise the markup is split on block
/// boundaries (`<div>`, `<p>`, `<br>`, newlines) and blank pieces are dropped.
/// Inline markup inside each item is preserved.
pub fn split_list_items(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    if find_open_tag(&lower, "li", 0).is_some() {
        return extract_tag_contents(html, &lower, "li");
    }

    let mut normalized = html.to_string();
    for boundary in ["<div>", "</div>", "<p>", "</p>", "<br>", "<br/>", "<br />"] {
        normalized = replace_ignore_case(&normalized, boundary, "\n");
    }
    normalized
        .lines()
        .map(str::trim)
        .filter(|line| !strip_html(line).trim().is_empty())
        .map(String::from)
        .collect()
}

fn extract_tag_contents(html: &str, lower: &str, tag: &str) -> Vec<String> {
    let close = format!("</{tag}>");
    let mut items = Vec::new();
    let mut cursor = 0;

    while let Some(tag_start) = find_open_tag(lower, tag, cursor) {
        let Some(open_end_rel) = lower[tag_start..].find('>') else {
            break;
        };
        let content_start = tag_start + open_end_rel + 1;
        let content_end = lower[content_start..]
            .find(&close)
            .map(|r| content_start + r)
            .unwrap_or(html.len());
        let item = html[content_start..content_end].trim();
        if !strip_html(item).trim().is_empty() {
            items.push(item.to_string());
        }
        cursor = (content_end + close.len()).min(html.len());
    }
    items
}

/// Byte offset of the next `<tag>` or `<tag ...>` at or after `from`.
/// `<li` does not match `<link>`.
fn find_open_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let open = format!("<{tag}");
    let mut cursor = from;
    while let Some(rel) = lower[cursor..].find(&open) {
        let start = cursor + rel;
        let after = start + open.len();
        match lower[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(start),
            _ => cursor = after,
        }
    }
    None
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(rel) = lower[cursor..].find(needle) {
        let start = cursor + rel;
        out.push_str(&haystack[cursor..start]);
        out.push_str(replacement);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags_and_decodes() {
        assert_eq!(
            strip_html("Led <b>Next.js</b> migration &amp; cut load by 40%"),
            "Led Next.js migration & cut load by 40%"
        );
    }

    #[test]
    fn test_strip_html_keeps_literal_angle_brackets() {
        assert_eq!(
            strip_html("Cut p99 latency < 10ms for 3 services"),
            "Cut p99 latency < 10ms for 3 services"
        );
        assert_eq!(strip_html("<i>a</i> <= b &lt; c"), "a <= b < c");
    }

    #[test]
    fn test_strip_html_decodes_named_and_numeric_entities() {
        assert_eq!(
            strip_html("Led migration &mdash; saved &#36;2M &#x2192; &eacute;t&eacute;"),
            "Led migration \u{2014} saved $2M \u{2192} \u{e9}t\u{e9}"
        );
        assert_eq!(strip_html("a&nbsp;b &amp;lt;"), "a b &lt;");
    }

    #[test]
    fn test_split_ignores_tags_that_only_start_with_li() {
        let items = split_list_items("<link rel=\"x\">One<br>Two");
        assert_eq!(items, vec!["<link rel=\"x\">One", "Two"]);
        let items = split_list_items("<ul><li class=\"a\">Kept</li></ul>");
        assert_eq!(items, vec!["Kept"]);
    }

    #[test]
    fn test_split_prefers_list_items() {
        let items = split_list_items("<ul><li>First <b>win</b></li><li> </li><LI>Second</LI></ul>");
        assert_eq!(items, vec!["First <b>win</b>", "Second"]);
    }

    #[test]
    fn test_split_falls_back_to_blocks() {
        let items = split_list_items("<div>One</div><div><br></div><div>Two</div>");
        assert_eq!(items, vec!["One", "Two"]);
    }

    #[test]
    fn test_split_plain_text_lines() {
        assert_eq!(split_list_items("alpha\n\nbeta"), vec!["alpha", "beta"]);
        assert!(split_list_items("   ").is_empty());
    }
}
