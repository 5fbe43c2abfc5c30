//! Resolved link-preview metadata.

/// Preview metadata for a shared link, produced once per successful
/// resolution.
///
/// Never partially populated: a resolver either produces a value with a valid
/// `thumbnail_url` or declines entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailInfo {
    /// The URL the preview was resolved for.
    pub image_url: String,
    /// Direct URL of the thumbnail image, if the provider exposes one.
    pub thumbnail_url: Option<String>,
    /// Text shown when hovering the preview.
    pub tooltip_text: Option<String>,
}

impl ThumbnailInfo {
    /// Creates preview metadata for a source URL.
    #[must_use]
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            thumbnail_url: None,
            tooltip_text: None,
        }
    }

    /// Sets the thumbnail image URL.
    #[must_use]
    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Sets the tooltip text.
    #[must_use]
    pub fn with_tooltip(mut self, text: impl Into<String>) -> Self {
        self.tooltip_text = Some(text.into());
        self
    }
}

/// Per-item context handed to thumbnail resolvers.
///
/// Carries what the surrounding feed item knows about itself; providers that
/// derive tooltips from the item body read it from here.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// Body text of the feed item the URL appeared in.
    pub item_text: Option<String>,
}

impl ResolveContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the item body text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.item_text = Some(text.into());
        self
    }
}
