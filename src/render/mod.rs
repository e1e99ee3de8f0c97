//! Markup for the latest-posts list.
//!
//! Rendering is a pure function from records and strings to an HTML
//! fragment. The fragment replaces the list container's contents wholesale;
//! the same input always yields the same markup.
//!
//! Every feed-sourced string is escaped before insertion. Configured strings
//! are escaped too.

mod date;
mod lead;

use std::fmt::Write;

pub use date::{format_date, format_pub_date, parse_pub_date};
pub use lead::remove_duplicate_lead;

use crate::feed::FeedRecord;
use crate::locale::{DateLocale, Strings};
use crate::util::{escape_html, is_valid_link, truncate_chars};

/// Character budget for post titles
pub const TITLE_LIMIT: usize = 90;

/// Everything the renderer needs besides the records themselves.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub strings: &'a Strings,
    pub locale: DateLocale,
    /// Name of the social network shown on each card ("Facebook")
    pub source_label: &'a str,
    /// External group page linked from the empty and error states
    pub group_url: Option<&'a str>,
    /// Character budget for descriptions
    pub description_limit: usize,
}

/// Renders one `<li>` per record.
pub fn render_items(records: &[FeedRecord], ctx: &RenderContext<'_>) -> String {
    let mut html = String::with_capacity(records.len() * 1024);
    for record in records {
        render_item(&mut html, record, ctx);
    }
    html
}

/// Renders a single state message (empty feed, load failure) with the
/// optional link to the group page.
pub fn render_state(message: &str, ctx: &RenderContext<'_>) -> String {
    let link = match ctx.group_url.filter(|u| is_valid_link(u)) {
        Some(url) => format!(
            r#" <a class="offers__item-link" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            escape_html(url),
            escape_html(&ctx.strings.open_group)
        ),
        None => String::new(),
    };

    format!(
        r#"<li class="offers__item offers__item--state">{}{}</li>"#,
        escape_html(message),
        link
    )
}

fn render_item(html: &mut String, record: &FeedRecord, ctx: &RenderContext<'_>) {
    let title_text = if record.title.trim().is_empty() {
        ctx.strings.default_title.as_str()
    } else {
        record.title.as_str()
    };
    let title = escape_html(&truncate_chars(title_text, TITLE_LIMIT)).into_owned();

    let description = truncate_chars(
        remove_duplicate_lead(&record.description, &record.title),
        ctx.description_limit,
    );
    let source = escape_html(ctx.source_label);

    // Writing into a String cannot fail
    let _ = writeln!(html, r#"<li class="offers__item">"#);

    match record.image.as_deref() {
        Some(src) => {
            let _ = writeln!(
                html,
                r#"  <figure class="offers__item-media"><img class="offers__item-img" src="{}" alt="{}" loading="lazy" decoding="async"></figure>"#,
                escape_html(src),
                title
            );
        }
        None => {
            let _ = writeln!(
                html,
                r#"  <figure class="offers__item-media offers__item-media--placeholder" aria-hidden="true"><span class="offers__item-media-label">{}</span><p class="offers__item-media-text">{}</p></figure>"#,
                source,
                escape_html(&ctx.strings.no_photo)
            );
        }
    }

    let _ = writeln!(html, r#"  <div class="offers__item-body">"#);
    let _ = write!(
        html,
        r#"    <div class="offers__item-head"><span class="offers__item-source">{}</span>"#,
        source
    );
    if let Some(date) = format_pub_date(&record.published, ctx.locale) {
        let _ = write!(html, r#"<p class="offers__item-meta">{}</p>"#, escape_html(&date));
    }
    let _ = writeln!(html, "</div>");

    let _ = writeln!(html, r#"    <h3 class="offers__item-title">{}</h3>"#, title);
    if !description.is_empty() {
        let _ = writeln!(
            html,
            r#"    <p class="offers__item-text">{}</p>"#,
            escape_html(&description).replace('\n', "<br>")
        );
    }
    let _ = writeln!(html, "  </div>");

    let _ = writeln!(
        html,
        r#"  <a class="offers__item-cta" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(&record.link),
        escape_html(&ctx.strings.read_post)
    );
    let _ = writeln!(html, "</li>");
}
