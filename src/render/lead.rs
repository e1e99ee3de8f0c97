use crate::util::normalize_text;

/// Splits off the leading sentence or line.
///
/// The lead runs up to and including the first `\n`, `.`, `!` or `?`; the
/// rest has leading whitespace and stray terminators trimmed. Text with no
/// terminator is all lead.
fn split_lead(text: &str) -> (&str, &str) {
    match text.find(['\n', '.', '!', '?']) {
        Some(idx) => {
            let rest = text[idx + 1..]
                .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?'));
            (&text[..=idx], rest)
        }
        None => (text, ""),
    }
}

/// Whether `text` begins with the whole words of `prefix`.
///
/// Both sides are normalized, so words are separated by single spaces.
fn starts_with_words(text: &str, prefix: &str) -> bool {
    text.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Whether the raw title shows it was cut by the source (`...` or `…`).
fn is_cut_title(title: &str) -> bool {
    let title = title.trim_end();
    title.ends_with("...") || title.ends_with('…')
}

/// Drops a description's opening sentence when it only restates the title.
///
/// The lead is a duplicate when its normalized form equals the normalized
/// title, or one starts with the other's whole words. A title the source cut
/// off with an ellipsis may also end mid-word inside the lead. When removing
/// the lead would leave nothing, the description is kept whole.
pub fn remove_duplicate_lead<'a>(description: &'a str, title: &str) -> &'a str {
    let norm_title = normalize_text(title);
    if norm_title.is_empty() {
        return description;
    }

    let (lead, rest) = split_lead(description);
    let norm_lead = normalize_text(lead);
    if norm_lead.is_empty() || rest.is_empty() {
        return description;
    }

    let duplicate = starts_with_words(&norm_lead, &norm_title)
        || starts_with_words(&norm_title, &norm_lead)
        || (is_cut_title(title) && norm_lead.starts_with(&norm_title));

    if duplicate {
        rest
    } else {
        description
    }
}
