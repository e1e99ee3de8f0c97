//! Utility functions shared by the feed and render stages.
//!
//! This module provides reusable utilities for:
//!
//! - **Text processing**: escaping, character-budget truncation, and the
//!   normalization used for dedupe keys and duplicate-lead detection
//! - **Link validation**: the `http(s)://` predicate applied to feed links
//! - **HTML extraction**: plain text and lead images from embedded markup
//!
//! # Examples
//!
//! ```
//! use offers_feed::util::{escape_html, normalize_text, truncate_chars};
//!
//! assert_eq!(escape_html("<b>"), "&lt;b&gt;");
//! assert_eq!(normalize_text("Hello, World!"), "hello world");
//! assert_eq!(truncate_chars("Long article title", 8), "Long ar…");
//! ```

mod html;
mod text;
mod url_validator;

pub use html::{first_image_src, html_to_text};
pub use text::{escape_html, normalize_text, strip_control_chars, truncate_chars};
pub use url_validator::{is_valid_link, normalize_link, validate_feed_url, UrlValidationError};
