use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Reader};
use serde::Deserialize;
use thiserror::Error;

use super::record::RawEntry;

/// Errors raised when a feed body is not well-formed for its declared format.
#[derive(Debug, Error)]
pub enum ParseError {
    /// RSS body is not well-formed XML
    #[error("Invalid RSS XML: {0}")]
    Xml(String),
    /// JSON Feed body is not valid JSON
    #[error("Invalid JSON feed: {0}")]
    Json(#[from] serde_json::Error),
    /// Atom body rejected by the syndication parser
    #[error("Invalid Atom feed: {0}")]
    Syndication(String),
}

/// Wire format of the configured feed.
///
/// Each deployment serves exactly one format; the choice comes from
/// configuration, never from sniffing the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 with the `content:` and `media:` extensions
    #[default]
    Rss,
    /// JSON Feed (`items` array)
    Json,
    /// Atom 1.0
    Atom,
}

impl FeedFormat {
    /// Decodes a feed body into its entries, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the body is malformed for this format.
    /// A well-formed document with no entries is `Ok(vec![])`.
    pub fn parse(self, bytes: &[u8]) -> Result<Vec<RawEntry>, ParseError> {
        match self {
            FeedFormat::Rss => parse_rss(bytes),
            FeedFormat::Json => parse_json(bytes),
            FeedFormat::Atom => parse_atom(bytes),
        }
    }
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FeedFormat::Rss => "rss",
            FeedFormat::Json => "json",
            FeedFormat::Atom => "atom",
        })
    }
}

// ============================================================================
// RSS
// ============================================================================

const CONTENT_NS: &[u8] = b"http://purl.org/rss/1.0/modules/content/";
const MEDIA_NS: &[u8] = b"http://search.yahoo.com/mrss/";
/// RSS 1.0 core namespace; RSS 2.0 core elements are unbound
const RSS1_NS: &[u8] = b"http://purl.org/rss/1.0/";

/// Child elements of `<item>` whose text we keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RssField {
    Title,
    Link,
    PubDate,
    Description,
    Encoded,
}

/// Elements the reader acts on, identified by namespace URI and local name
/// so that any prefix bound to a known namespace works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RssElement {
    Item,
    Field(RssField),
    MediaContent,
    MediaThumbnail,
    Enclosure,
    Other,
}

impl RssElement {
    fn resolve(ns: &ResolveResult<'_>, local: &[u8]) -> Self {
        let core = match ns {
            ResolveResult::Unbound => true,
            ResolveResult::Bound(Namespace(uri)) => *uri == RSS1_NS,
            ResolveResult::Unknown(_) => false,
        };

        match (ns, local) {
            (ResolveResult::Bound(Namespace(uri)), b"encoded") if *uri == CONTENT_NS => {
                Self::Field(RssField::Encoded)
            }
            (ResolveResult::Bound(Namespace(uri)), b"content") if *uri == MEDIA_NS => {
                Self::MediaContent
            }
            (ResolveResult::Bound(Namespace(uri)), b"thumbnail") if *uri == MEDIA_NS => {
                Self::MediaThumbnail
            }
            _ if !core => Self::Other,
            (_, b"item") => Self::Item,
            (_, b"enclosure") => Self::Enclosure,
            (_, b"title") => Self::Field(RssField::Title),
            (_, b"link") => Self::Field(RssField::Link),
            (_, b"pubDate") => Self::Field(RssField::PubDate),
            (_, b"description") => Self::Field(RssField::Description),
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Default)]
struct RssItem {
    title: String,
    link: String,
    pub_date: String,
    description: String,
    encoded: String,
    media_content: Option<String>,
    media_thumbnail: Option<String>,
    enclosure: Option<String>,
}

impl RssItem {
    fn push_text(&mut self, field: RssField, text: &str) {
        let target = match field {
            RssField::Title => &mut self.title,
            RssField::Link => &mut self.link,
            RssField::PubDate => &mut self.pub_date,
            RssField::Description => &mut self.description,
            RssField::Encoded => &mut self.encoded,
        };
        target.push_str(text);
    }

    /// Records image candidates from `media:content`, `media:thumbnail` and `enclosure`.
    fn take_media(&mut self, element: RssElement, e: &BytesStart<'_>, reader: &Reader<&[u8]>) {
        let slot = match element {
            RssElement::MediaContent => &mut self.media_content,
            RssElement::MediaThumbnail => &mut self.media_thumbnail,
            RssElement::Enclosure => {
                // Enclosures may be audio or video; only typed-as-image or untyped ones count
                let is_image = attr_value(e, reader, b"type")
                    .map_or(true, |t| t.trim().to_ascii_lowercase().starts_with("image/"));
                if !is_image {
                    return;
                }
                &mut self.enclosure
            }
            _ => return,
        };

        if slot.is_none() {
            *slot = attr_value(e, reader, b"url")
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty());
        }
    }

    fn into_raw(self) -> RawEntry {
        let non_empty = |s: String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };

        // Encoded content is the full post body; description is often a summary
        let description = non_empty(self.encoded).or_else(|| non_empty(self.description));

        RawEntry {
            title: non_empty(self.title),
            link: non_empty(self.link),
            published: non_empty(self.pub_date),
            image_markup: description.clone(),
            description,
            image: self
                .media_content
                .or(self.media_thumbnail)
                .or(self.enclosure),
        }
    }
}

fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed RSS attribute");
                continue;
            }
        };
        if attr.key.as_ref() == key {
            return attr
                .decode_and_unescape_value(reader.decoder())
                .ok()
                .map(Cow::into_owned);
        }
    }
    None
}

/// Parses RSS 2.0 items.
///
/// Entity declarations in a DOCTYPE are never expanded (see SEC-002 note in
/// Cargo.toml): only the five XML builtins and character references are
/// decoded. Text is not trimmed while collecting, so text and CDATA pieces of
/// one field keep the whitespace between them.
fn parse_rss(bytes: &[u8]) -> Result<Vec<RawEntry>, ParseError> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut depth: usize = 0;
    let mut saw_root = false;
    let mut item: Option<RssItem> = None;
    // Field being collected and the depth of its element
    let mut field: Option<(RssField, usize)> = None;

    loop {
        // Resolve the namespace right away so the reader is free again
        let resolved = reader.read_resolved_event_into(&mut buf).map(|(ns, event)| {
            let element = match &event {
                Event::Start(e) | Event::Empty(e) => RssElement::resolve(&ns, e.local_name().as_ref()),
                Event::End(e) => RssElement::resolve(&ns, e.local_name().as_ref()),
                _ => RssElement::Other,
            };
            (element, event)
        });

        let (element, event) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(e) => {
                depth += 1;
                saw_root = true;

                if element == RssElement::Item {
                    item = Some(RssItem::default());
                    field = None;
                } else if let Some(current) = item.as_mut() {
                    if let (None, RssElement::Field(f)) = (field, element) {
                        field = Some((f, depth));
                    }
                    current.take_media(element, &e, &reader);
                }
            }
            Event::Empty(e) => {
                saw_root = true;
                if let Some(current) = item.as_mut() {
                    current.take_media(element, &e, &reader);
                }
            }
            Event::Text(t) => {
                if let (Some(current), Some((f, _))) = (item.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    current.push_text(f, &text);
                }
            }
            Event::CData(c) => {
                if let (Some(current), Some((f, _))) = (item.as_mut(), field) {
                    current.push_text(f, &String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if matches!(field, Some((_, d)) if d == depth) {
                    field = None;
                }
                if element == RssElement::Item {
                    if let Some(done) = item.take() {
                        entries.push(done.into_raw());
                    }
                    field = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ParseError::Xml("document has no root element".to_owned()));
    }
    if depth != 0 {
        return Err(ParseError::Xml(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }

    Ok(entries)
}

// ============================================================================
// JSON Feed
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonItem {
    title: Option<String>,
    url: Option<String>,
    external_url: Option<String>,
    date_published: Option<String>,
    date_modified: Option<String>,
    content_html: Option<String>,
    content_text: Option<String>,
}

/// Parses JSON Feed items.
///
/// A document without an `items` array has no entries. Items that do not
/// deserialize (wrong field types, not an object) are skipped with a warning.
fn parse_json(bytes: &[u8]) -> Result<Vec<RawEntry>, ParseError> {
    let doc: serde_json::Value = serde_json::from_slice(bytes)?;

    let Some(items) = doc.get("items").and_then(|v| v.as_array()) else {
        tracing::debug!("JSON feed has no items array, treating as empty");
        return Ok(Vec::new());
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, value) in items.iter().enumerate() {
        let item: JsonItem = match serde_json::from_value(value.clone()) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(index = index, error = %e, "Skipping malformed JSON feed item");
                continue;
            }
        };

        // Images are only ever taken from the HTML body in this format
        let image_markup = item.content_html.clone();

        let description = match (item.content_html, item.content_text) {
            (Some(html), Some(text)) => {
                if text.chars().count() > html.chars().count() {
                    Some(text)
                } else {
                    Some(html)
                }
            }
            (html, text) => html.or(text),
        };

        entries.push(RawEntry {
            title: item.title,
            link: item.url.or(item.external_url),
            published: item.date_published.or(item.date_modified),
            description,
            image: None,
            image_markup,
        });
    }

    Ok(entries)
}

// ============================================================================
// Atom
// ============================================================================

fn parse_atom(bytes: &[u8]) -> Result<Vec<RawEntry>, ParseError> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| ParseError::Syndication(e.to_string()))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let image = entry.media.iter().find_map(|media| {
                media
                    .content
                    .iter()
                    .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
                    .or_else(|| media.thumbnails.first().map(|t| t.image.uri.clone()))
            });

            let description = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content));

            RawEntry {
                title: entry.title.map(|t| t.content),
                link: entry.links.first().map(|l| l.href.clone()),
                published: entry.published.or(entry.updated).map(|dt| dt.to_rfc3339()),
                image_markup: description.clone(),
                description,
                image,
            }
        })
        .collect();

    Ok(entries)
}
