//! Pagination of the posts list behind a "show more" / "show less" toggle.
//!
//! [`FeedPanel`] owns the only piece of view state (expanded or collapsed)
//! and drives a [`PanelHost`], the adapter that actually mutates a
//! container. All markup comes from [`crate::render`].

use crate::feed::FeedRecord;
use crate::pipeline::FeedOutcome;
use crate::render::{render_items, render_state, RenderContext};
use crate::util::escape_html;

/// The toggle control as the host should display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub label: String,
    pub expanded: bool,
}

/// Adapter over the page elements the panel writes to.
///
/// `replace_list` swaps the whole list content. `upsert_toggle` creates the
/// toggle on first call and updates it in place afterwards.
pub trait PanelHost {
    fn replace_list(&mut self, html: &str);
    fn upsert_toggle(&mut self, toggle: &ToggleControl);
    fn remove_toggle(&mut self);
}

/// What the panel is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Records(Vec<FeedRecord>),
    Empty,
    Failed,
}

/// Expand/collapse controller for the posts list.
pub struct FeedPanel<'a, H: PanelHost> {
    host: H,
    ctx: RenderContext<'a>,
    preview_limit: usize,
    content: Content,
    expanded: bool,
}

impl<'a, H: PanelHost> FeedPanel<'a, H> {
    pub fn new(host: H, ctx: RenderContext<'a>, preview_limit: usize) -> Self {
        Self {
            host,
            ctx,
            preview_limit,
            content: Content::Empty,
            expanded: false,
        }
    }

    /// Displays the result of a feed load and resets to the collapsed state.
    pub fn show(&mut self, outcome: FeedOutcome) {
        self.expanded = false;
        self.content = match outcome {
            FeedOutcome::Loaded(records) if records.is_empty() => Content::Empty,
            FeedOutcome::Loaded(records) => Content::Records(records),
            FeedOutcome::FetchFailed(e) => {
                tracing::warn!(error = %e, "Feed fetch failed, showing error state");
                Content::Failed
            }
            FeedOutcome::ParseFailed(e) => {
                tracing::warn!(error = %e, "Feed parse failed, showing error state");
                Content::Failed
            }
        };
        self.render();
    }

    /// Flips between collapsed and expanded.
    ///
    /// Does nothing unless a toggle is shown, i.e. there are more records
    /// than the preview limit.
    pub fn toggle(&mut self) {
        if !self.has_toggle() {
            return;
        }
        self.expanded = !self.expanded;
        tracing::debug!(expanded = self.expanded, "Feed panel toggled");
        self.render();
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn has_toggle(&self) -> bool {
        matches!(&self.content, Content::Records(r) if r.len() > self.preview_limit)
    }

    fn render(&mut self) {
        match &self.content {
            Content::Records(records) => {
                let visible = if self.expanded {
                    records.as_slice()
                } else {
                    &records[..records.len().min(self.preview_limit)]
                };
                self.host.replace_list(&render_items(visible, &self.ctx));

                if records.len() > self.preview_limit {
                    let label = if self.expanded {
                        &self.ctx.strings.show_less
                    } else {
                        &self.ctx.strings.show_more
                    };
                    self.host.upsert_toggle(&ToggleControl {
                        label: label.clone(),
                        expanded: self.expanded,
                    });
                } else {
                    self.host.remove_toggle();
                }
            }
            Content::Empty => {
                self.host
                    .replace_list(&render_state(&self.ctx.strings.empty_feed, &self.ctx));
                self.host.remove_toggle();
            }
            Content::Failed => {
                self.host
                    .replace_list(&render_state(&self.ctx.strings.fetch_error, &self.ctx));
                self.host.remove_toggle();
            }
        }
    }
}

/// In-memory host: keeps the list markup and toggle as plain values.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    pub list_html: String,
    pub toggle: Option<ToggleControl>,
    /// Number of times a toggle was created (not updated)
    pub toggles_created: usize,
}

impl PanelHost for MemoryHost {
    fn replace_list(&mut self, html: &str) {
        html.clone_into(&mut self.list_html);
    }

    fn upsert_toggle(&mut self, toggle: &ToggleControl) {
        match self.toggle.as_mut() {
            Some(existing) => existing.clone_from(toggle),
            None => {
                self.toggle = Some(toggle.clone());
                self.toggles_created += 1;
            }
        }
    }

    fn remove_toggle(&mut self) {
        self.toggle = None;
    }
}

/// Host that assembles a standalone HTML fragment: the list container
/// followed by the toggle button, if any.
#[derive(Debug, Default, Clone)]
pub struct DocumentHost {
    inner: MemoryHost,
}

impl DocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<ul class=\"offers__list\" data-offers-list>\n{}</ul>\n",
            self.inner.list_html
        );
        if let Some(toggle) = &self.inner.toggle {
            html.push_str(&format!(
                "<button class=\"offers__toggle\" type=\"button\" data-offers-toggle aria-expanded=\"{}\">{}</button>\n",
                toggle.expanded,
                escape_html(&toggle.label)
            ));
        }
        html
    }
}

impl PanelHost for DocumentHost {
    fn replace_list(&mut self, html: &str) {
        self.inner.replace_list(html);
    }

    fn upsert_toggle(&mut self, toggle: &ToggleControl) {
        self.inner.upsert_toggle(toggle);
    }

    fn remove_toggle(&mut self) {
        self.inner.remove_toggle();
    }
}
