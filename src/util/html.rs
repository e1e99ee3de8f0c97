//! Plain-text and image extraction from HTML fragments embedded in feed items.
//!
//! Feed descriptions arrive as HTML written by a third party. Nothing here
//! renders that markup; it is only read to recover text and the lead image.

use std::borrow::Cow;

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content starts and ends on its own line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "pre", "section", "table", "tr", "ul",
];

/// Elements whose content is never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Converts an HTML fragment to plain text.
///
/// Markup is removed and entities are decoded. Paragraphs are separated by a
/// blank line; other block elements and `<br>` start a new line. Within a
/// line, whitespace runs collapse to a single space. Lines are trimmed, runs
/// of blank lines collapse to one, and the result has no leading or trailing
/// whitespace.
///
/// Input without any `<` is treated as plain text, so line breaks in plain
/// text feeds survive; its entities are still decoded.
///
/// # Examples
///
/// ```
/// use offers_feed::util::html_to_text;
///
/// assert_eq!(html_to_text("<p>First</p><p>Second<br>line</p>"), "First\n\nSecond\nline");
/// assert_eq!(html_to_text("Tom &amp; <b>Jerry</b>"), "Tom & Jerry");
/// ```
pub fn html_to_text(markup: &str) -> String {
    if !markup.contains('<') {
        return tidy_lines(&decode_entities(markup));
    }

    let fragment = Html::parse_fragment(markup);
    let mut raw = String::with_capacity(markup.len());
    collect_text(fragment.root_element(), &mut raw);
    tidy_lines(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                // Source newlines inside markup are layout, not content
                out.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
            }
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let breaks = match name {
                    "p" => 2,
                    n if BLOCK_ELEMENTS.contains(&n) => 1,
                    _ => 0,
                };

                ensure_breaks(out, breaks);
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                ensure_breaks(out, breaks);
            }
            _ => {}
        }
    }
}

/// Decodes character references in tag-free text, keeping its newlines.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let fragment = Html::parse_fragment(text);
    Cow::Owned(fragment.root_element().text().collect())
}

/// Pads `out` so it ends with at least `count` line breaks (ignoring spaces).
fn ensure_breaks(out: &mut String, count: usize) {
    if count == 0 || out.trim().is_empty() {
        return;
    }
    let trailing = out
        .trim_end_matches([' ', '\t'])
        .chars()
        .rev()
        .take_while(|&c| c == '\n')
        .count();
    for _ in trailing..count {
        out.push('\n');
    }
}

/// Trims lines, collapses inner whitespace and squeezes blank-line runs.
fn tidy_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_pending = false;

    for line in raw.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            blank_pending = !out.is_empty();
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if blank_pending {
                out.push('\n');
            }
        }
        blank_pending = false;
        out.push_str(&words.join(" "));
    }

    out
}

/// Returns the `src` of the first `<img>` in an HTML fragment, if it has one.
///
/// The value is returned as written (trimmed); callers decide whether it is a
/// usable absolute URL.
pub fn first_image_src(markup: &str) -> Option<String> {
    if !markup.to_ascii_lowercase().contains("<img") {
        return None;
    }

    let selector = Selector::parse("img").ok()?;
    let fragment = Html::parse_fragment(markup);
    let img = fragment.select(&selector).next()?;

    img.value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_passthrough_keeps_lines() {
        assert_eq!(html_to_text("  line one \n\n\n\n line   two  "), "line one\n\nline two");
    }

    #[test]
    fn test_entities_decoded_without_tags() {
        assert_eq!(html_to_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_to_text("Don&#39;t miss &quot;it&quot;"), "Don't miss \"it\"");
        assert_eq!(html_to_text("one &amp; two\n\nthree"), "one & two\n\nthree");
        // A bare ampersand is just text
        assert_eq!(html_to_text("AT&T & friends"), "AT&T & friends");
        // Decoding is a single level
        assert_eq!(html_to_text("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
    }

    #[test]
    fn test_strips_inline_markup() {
        assert_eq!(html_to_text("<b>Bold</b> and <i>italic</i>"), "Bold and italic");
    }

    #[test]
    fn test_paragraphs_become_blank_line_separated() {
        assert_eq!(
            html_to_text("<p>Jauna kolekcija!</p>\n<p>Skatiet veikalā.</p>"),
            "Jauna kolekcija!\n\nSkatiet veikalā."
        );
    }

    #[test]
    fn test_br_becomes_newline() {
        assert_eq!(html_to_text("one<br>two<br/>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_source_newlines_inside_markup_are_spaces() {
        assert_eq!(html_to_text("<span>wrapped\nsource\ntext</span>"), "wrapped source text");
    }

    #[test]
    fn test_list_items_on_own_lines() {
        assert_eq!(html_to_text("<ul><li>a</li><li>b</li></ul>"), "a\nb");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(html_to_text("<p>Tom &amp; Jerry &lt;3</p>"), "Tom & Jerry <3");
    }

    #[test]
    fn test_script_content_dropped() {
        assert_eq!(
            html_to_text("<p>safe</p><script>alert('x')</script>"),
            "safe"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("<p> </p><div></div>"), "");
    }

    #[test]
    fn test_first_image_src() {
        let html = r#"<p>text</p><img src=" https://cdn.example.com/a.jpg "><img src="https://cdn.example.com/b.jpg">"#;
        assert_eq!(first_image_src(html).as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_first_image_src_missing() {
        assert_eq!(first_image_src("<p>no images here</p>"), None);
        assert_eq!(first_image_src(""), None);
    }

    #[test]
    fn test_first_image_without_src() {
        assert_eq!(first_image_src("<img alt=\"x\">"), None);
    }
}
