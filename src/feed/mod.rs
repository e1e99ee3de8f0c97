//! Feed ingestion: fetching, parsing and shaping posts for the panel.
//!
//! - [`fetcher`] - Single-attempt HTTP retrieval of the feed body
//! - [`parser`] - RSS, JSON Feed and Atom decoding behind [`FeedFormat`]
//! - [`normalize`] - Markup stripping, link fallback and lead-image selection
//! - [`dedupe`] - Link filtering, first-seen-wins dedupe and the item cap
//!
//! # Example
//!
//! ```ignore
//! use offers_feed::feed::{dedupe_and_limit, fetch_feed, normalize_all, FeedFormat};
//!
//! let bytes = fetch_feed(&client, &source).await?;
//! let entries = FeedFormat::Rss.parse(&bytes)?;
//! let records = dedupe_and_limit(normalize_all(entries, fallback), 12);
//! ```

mod dedupe;
mod fetcher;
mod normalize;
mod parser;
mod record;

pub use dedupe::{dedupe_and_limit, dedupe_key};
pub use fetcher::{fetch_feed, FeedSource, FetchError, DEFAULT_MAX_FEED_SIZE};
pub use normalize::{normalize, normalize_all};
pub use parser::{FeedFormat, ParseError};
pub use record::{FeedRecord, RawEntry};
