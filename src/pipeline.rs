//! Fetch-then-shape orchestration.
//!
//! [`load_feed`] is the only async step: it fetches once, then parses,
//! normalizes and dedupes synchronously. Its [`FeedOutcome`] is handed to
//! [`crate::panel::FeedPanel::show`] for rendering.

use reqwest::redirect::Policy;

use crate::config::Config;
use crate::feed::{
    dedupe_and_limit, fetch_feed, normalize_all, FeedFormat, FeedRecord, FetchError, ParseError,
};

/// Feed hosts redirect at most a couple of times (tracking links, CDN edges)
const MAX_REDIRECTS: usize = 5;

/// Result of one feed load.
#[derive(Debug)]
pub enum FeedOutcome {
    /// Qualifying records, possibly none
    Loaded(Vec<FeedRecord>),
    FetchFailed(FetchError),
    ParseFailed(ParseError),
}

impl FeedOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FeedOutcome::Loaded(_))
    }
}

/// Redirect policy for feed requests.
///
/// - Caps the chain at [`MAX_REDIRECTS`] hops
/// - Fails on loops (same URL appearing twice in chain)
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("Too many redirects");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Builds the HTTP client used for the feed request.
///
/// The per-request timeout comes from [`crate::feed::FeedSource`], not the client.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(redirect_policy())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Parses, normalizes, dedupes and caps an already-fetched body.
///
/// # Errors
///
/// Returns [`ParseError`] when the body is malformed for `format`.
pub fn process_body(
    bytes: &[u8],
    format: FeedFormat,
    fallback_link: &str,
    limit: usize,
) -> Result<Vec<FeedRecord>, ParseError> {
    let entries = format.parse(bytes)?;
    let parsed = entries.len();
    let records = dedupe_and_limit(normalize_all(entries, fallback_link), limit);

    tracing::info!(
        format = %format,
        parsed = parsed,
        kept = records.len(),
        "Feed processed"
    );

    Ok(records)
}

/// Fetches the configured feed and turns it into qualifying records.
///
/// Never returns an error: failures are folded into the outcome so the
/// caller can render the matching state.
pub async fn load_feed(client: &reqwest::Client, config: &Config) -> FeedOutcome {
    let source = config.feed_source();

    let bytes = match fetch_feed(client, &source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(feed = %source.url, error = %e, "Failed to fetch feed");
            return FeedOutcome::FetchFailed(e);
        }
    };

    match process_body(&bytes, config.format, config.fallback_link(), config.feed_limit) {
        Ok(records) => FeedOutcome::Loaded(records),
        Err(e) => {
            tracing::warn!(feed = %source.url, error = %e, "Failed to parse feed");
            FeedOutcome::ParseFailed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "https://www.facebook.com/groups/1";

    #[test]
    fn test_process_body_dedupes_and_caps() {
        let rss = r#"<rss><channel>
            <item><title>Sale!</title><link>https://example.com/1</link></item>
            <item><title>SALE</title><link>https://example.com/2</link></item>
            <item><title>News</title><link>/relative</link></item>
            <item><title>Third</title><link>https://example.com/3</link></item>
        </channel></rss>"#;

        let records = process_body(rss.as_bytes(), FeedFormat::Rss, FALLBACK, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].link, "https://example.com/1");
        // Relative link replaced by the fallback, not dropped
        assert_eq!(records[1].title, "News");
        assert_eq!(records[1].link, FALLBACK);
    }

    #[test]
    fn test_process_body_invalid_fallback_drops_bad_links() {
        let rss = r#"<rss><channel>
            <item><title>Bad</title><link>javascript:void(0)</link></item>
            <item><title>Good</title><link>https://example.com/g</link></item>
        </channel></rss>"#;

        let records = process_body(rss.as_bytes(), FeedFormat::Rss, "", 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Good");
    }

    #[test]
    fn test_process_body_double_escaped_title_is_a_duplicate() {
        let rss = r#"<rss><channel>
            <item><title>Don&amp;#39;t miss &amp;amp; save</title><link>https://example.com/1</link></item>
            <item><title>Don't miss &amp; save</title><link>https://example.com/2</link></item>
        </channel></rss>"#;

        let records = process_body(rss.as_bytes(), FeedFormat::Rss, FALLBACK, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Don't miss & save");
        assert_eq!(records[0].link, "https://example.com/1");
    }

    #[test]
    fn test_process_body_parse_error() {
        assert!(process_body(b"<rss><channel>", FeedFormat::Rss, FALLBACK, 4).is_err());
    }
}
