use std::borrow::Cow;

/// Ellipsis appended when text is cut to a character budget
const ELLIPSIS: char = '…';

/// Truncates a string to at most `max_chars` characters.
///
/// Strings at or under the budget are returned unchanged (borrowed). Longer
/// strings keep their first `max_chars - 1` characters, lose any trailing
/// whitespace at the cut, and get a single `…` appended, so the result never
/// exceeds the budget.
///
/// Lengths are counted in `char`s, not bytes, so Cyrillic and Latvian text
/// is measured the same way as ASCII.
///
/// # Examples
///
/// ```
/// use offers_feed::util::truncate_chars;
///
/// assert_eq!(truncate_chars("Short", 10), "Short");
/// assert_eq!(truncate_chars("Hello World", 8), "Hello W…");
/// assert_eq!(truncate_chars("Hello World", 7), "Hello…");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    // Byte offset of the char that would overflow the budget, if any
    let cut = match s.char_indices().nth(max_chars) {
        None => return Cow::Borrowed(s),
        Some(_) => s
            .char_indices()
            .nth(max_chars - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(s.len()),
    };

    let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
    out.push_str(s[..cut].trim_end());
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Escapes the five HTML-reserved characters (`& < > " '`).
///
/// Every feed-sourced string goes through this before it is placed in markup,
/// both in text nodes and in attribute values.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Normalizes text for equality checks between posts.
///
/// Lower-cases, collapses every run of characters that are neither letters
/// nor digits into a single space, and trims. `"Hello, World!!"` and
/// `"hello world"` normalize to the same key.
pub fn normalize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Strips ASCII control characters other than tab, newline and carriage return.
///
/// Feed text occasionally carries stray C0 bytes that are not allowed in HTML
/// documents.
///
/// Returns `Cow::Borrowed` when the input contains no control characters (common case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_control = |c: char| c == '\x7f' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'));

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_control(c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_under_budget_is_borrowed() {
        let result = truncate_chars("Short", 10);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Short");
    }

    #[test]
    fn test_truncate_exact_fit() {
        assert_eq!(truncate_chars("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_chars("123456", 5), "1234…");
    }

    #[test]
    fn test_truncate_trims_whitespace_at_cut() {
        // Cut lands right after "Hello " -> trailing space trimmed
        assert_eq!(truncate_chars("Hello World", 7), "Hello…");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // 6 Cyrillic chars = 12 bytes
        assert_eq!(truncate_chars("привет", 6), "привет");
        assert_eq!(truncate_chars("привет", 4), "при…");
        assert_eq!(truncate_chars("ģērbšanās", 5), "ģērb…");
    }

    #[test]
    fn test_truncate_zero_budget() {
        assert_eq!(truncate_chars("Test", 0), "");
    }

    #[test]
    fn test_escape_all_reserved() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_clean_text_borrowed() {
        let result = escape_html("plain text");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_is_not_idempotent_on_ampersand() {
        // Already-escaped input is escaped again; callers escape exactly once.
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_normalize_collapses_punctuation_and_case() {
        assert_eq!(normalize_text("  Hello,   World!! "), "hello world");
        assert_eq!(normalize_text("HELLO world"), "hello world");
        assert_eq!(normalize_text("Sale -- 50% off!"), "sale 50 off");
    }

    #[test]
    fn test_normalize_keeps_unicode_letters() {
        assert_eq!(normalize_text("Jaunā Kolekcija!"), "jaunā kolekcija");
        assert_eq!(normalize_text("Новая, коллекция"), "новая коллекция");
    }

    #[test]
    fn test_normalize_only_punctuation_is_empty() {
        assert_eq!(normalize_text("!!! ... ???"), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_strip_control_chars() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x7f"), "hello");
        let clean = strip_control_chars("line1\nline2\ttab");
        assert!(matches!(clean, Cow::Borrowed(_)));
    }

    proptest! {
        #[test]
        fn prop_truncate_respects_budget(s in "\\PC{0,200}", budget in 1usize..120) {
            let out = truncate_chars(&s, budget);
            prop_assert!(out.chars().count() <= budget);
            if s.chars().count() <= budget {
                prop_assert_eq!(out.as_ref(), s.as_str());
            } else {
                prop_assert!(out.ends_with('…'));
            }
        }

        #[test]
        fn prop_truncate_exact_length_without_whitespace(s in "[a-zA-Z0-9]{1,200}", budget in 1usize..120) {
            let out = truncate_chars(&s, budget);
            if s.chars().count() > budget {
                prop_assert_eq!(out.chars().count(), budget);
            }
        }

        #[test]
        fn prop_escape_leaves_no_raw_markup(s in "\\PC{0,100}") {
            let out = escape_html(&s);
            prop_assert!(!out.contains('<'));
            prop_assert!(!out.contains('>'));
            prop_assert!(!out.contains('"'));
            prop_assert!(!out.contains('\''));
        }

        #[test]
        fn prop_normalize_is_idempotent(s in "[a-zA-Z0-9 ,.!?ā-žа-яА-Я-]{0,100}") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once.clone());
        }
    }
}
