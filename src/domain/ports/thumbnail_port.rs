//! Port definition for site-specific thumbnail resolvers.

use regex::Regex;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{ResolveContext, ThumbnailInfo};

/// Port for one provider's thumbnail resolution strategy.
///
/// A resolver recognizes URLs from a single site via `url_pattern` and, on
/// match, may issue secondary requests to produce preview metadata. All
/// internal failures are soft: parse errors, schema mismatches, and
/// cancellation resolve to `None`, never an error.
#[async_trait::async_trait]
pub trait ThumbnailService: Send + Sync {
    /// Pattern recognizing this provider's URLs. Named capture groups are
    /// re-matched by `resolve` to template secondary request URLs.
    fn url_pattern(&self) -> &Regex;

    /// Resolves preview metadata for a URL already known to match
    /// `url_pattern`. `None` means the provider declined.
    async fn resolve(
        &self,
        url: &str,
        ctx: &ResolveContext,
        cancel: &CancellationToken,
    ) -> Option<ThumbnailInfo>;
}
