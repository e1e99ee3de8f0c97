use super::record::{FeedRecord, RawEntry};
use crate::util::{first_image_src, html_to_text, is_valid_link, normalize_link, strip_control_chars};

/// Turns a raw source entry into a [`FeedRecord`].
///
/// - title and description lose their markup (block boundaries become line breaks)
/// - a missing or non-`http(s)` link becomes `fallback_link`
/// - the image is the declared media URL, or else the first `<img>` in the
///   entry's image markup; either must be an absolute `http(s)` URL
pub fn normalize(raw: RawEntry, fallback_link: &str) -> FeedRecord {
    let markup = raw.description.unwrap_or_default();

    let image = raw
        .image
        .map(|u| u.trim().to_owned())
        .filter(|u| is_valid_link(u))
        .or_else(|| {
            raw.image_markup
                .as_deref()
                .and_then(first_image_src)
                .filter(|u| is_valid_link(u))
        });

    FeedRecord {
        title: plain_text(raw.title.as_deref().unwrap_or_default()),
        link: normalize_link(raw.link.as_deref(), fallback_link),
        published: raw.published.map(|p| p.trim().to_owned()).unwrap_or_default(),
        description: plain_text(&markup),
        image,
    }
}

/// Normalizes every entry, keeping source order.
pub fn normalize_all(entries: Vec<RawEntry>, fallback_link: &str) -> Vec<FeedRecord> {
    entries
        .into_iter()
        .map(|raw| normalize(raw, fallback_link))
        .collect()
}

fn plain_text(markup: &str) -> String {
    strip_control_chars(&html_to_text(markup)).into_owned()
}
