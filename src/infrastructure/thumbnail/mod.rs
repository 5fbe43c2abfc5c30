//! Site-specific thumbnail resolver adapters.

mod tumblr;

use std::sync::Arc;

pub use tumblr::TumblrThumbnailService;

use crate::application::ThumbnailRegistry;
use crate::domain::ports::FetchBytes;

/// Builds a registry with every built-in resolver, in priority order.
#[must_use]
pub fn default_registry(fetcher: Arc<dyn FetchBytes>) -> ThumbnailRegistry {
    let mut registry = ThumbnailRegistry::new();
    registry.register(Box::new(TumblrThumbnailService::new(fetcher)));
    registry
}
