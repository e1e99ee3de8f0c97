/// One entry as it appears in the source document, before normalization.
///
/// All text fields are raw: titles and descriptions may still contain
/// markup, links have not been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Timestamp text in whatever format the source uses
    pub published: Option<String>,
    /// Description markup (the richest body the source offered)
    pub description: Option<String>,
    /// Explicit media/enclosure image URL, if the source declares one
    pub image: Option<String>,
    /// Markup searched for an `<img>` when no usable image is declared
    pub image_markup: Option<String>,
}

/// A normalized post, ready for dedupe and rendering.
///
/// Built fresh for every fetch and owned by the pipeline run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    /// Plain-text title, possibly empty
    pub title: String,
    /// Absolute `http(s)://` link, or the configured fallback URL
    pub link: String,
    /// Source timestamp text; parsed only when rendering
    pub published: String,
    /// Plain-text description with line breaks preserved
    pub description: String,
    /// Absolute URL of the lead image
    pub image: Option<String>,
}
