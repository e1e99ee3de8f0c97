//! Latest-posts panel for the marketing site.
//!
//! Fetches the group's social feed once, shapes it into a bounded list of
//! posts, and renders the list with a "show more" toggle.
//!
//! - [`feed`] - Fetching, parsing, normalization and dedupe
//! - [`render`] - HTML for post cards and state messages
//! - [`panel`] - Expand/collapse pagination over a [`panel::PanelHost`]
//! - [`pipeline`] - Glue from configuration to a [`pipeline::FeedOutcome`]

pub mod config;
pub mod feed;
pub mod locale;
pub mod panel;
pub mod pipeline;
pub mod render;
pub mod util;
