//! First-match-wins thumbnail resolver dispatch.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::domain::entities::{ResolveContext, ThumbnailInfo};
use crate::domain::ports::ThumbnailService;

/// Ordered set of thumbnail resolvers.
///
/// Registration order is the priority order: the first resolver whose
/// pattern matches a URL handles it, and no other resolver is consulted.
/// Adding a provider is pure registration; the dispatch loop never changes.
#[derive(Default)]
pub struct ThumbnailRegistry {
    services: Vec<Box<dyn ThumbnailService>>,
}

impl ThumbnailRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver at the lowest priority.
    pub fn register(&mut self, service: Box<dyn ThumbnailService>) {
        self.services.push(service);
    }

    /// Number of registered resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no resolvers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Resolves preview metadata for `url`.
    ///
    /// Returns `None` without network access when no pattern matches, and
    /// `None` when the matching resolver declines or fails internally;
    /// resolver failures never propagate as errors.
    pub async fn resolve_thumbnail(
        &self,
        url: &str,
        ctx: &ResolveContext,
        cancel: &CancellationToken,
    ) -> Option<ThumbnailInfo> {
        for service in &self.services {
            if service.url_pattern().is_match(url) {
                trace!(url, "thumbnail pattern matched");
                let info = service.resolve(url, ctx, cancel).await;
                if info.is_none() {
                    debug!(url, "resolver declined");
                }
                return info;
            }
        }

        trace!(url, "no thumbnail pattern matched");
        None
    }
}

impl std::fmt::Debug for ThumbnailRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailRegistry")
            .field("services", &self.services.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use regex::Regex;

    use super::*;

    struct StubService {
        pattern: Regex,
        result: Option<ThumbnailInfo>,
        calls: Arc<AtomicUsize>,
    }

    impl StubService {
        fn new(pattern: &str, result: Option<ThumbnailInfo>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    pattern: Regex::new(pattern).unwrap(),
                    result,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait::async_trait]
    impl ThumbnailService for StubService {
        fn url_pattern(&self) -> &Regex {
            &self.pattern
        }

        async fn resolve(
            &self,
            _url: &str,
            _ctx: &ResolveContext,
            _cancel: &CancellationToken,
        ) -> Option<ThumbnailInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_unmatched_url_resolves_to_none_without_resolver_calls() {
        let (service, calls) = StubService::new(r"https?://photos\.example/", None);
        let mut registry = ThumbnailRegistry::new();
        registry.register(Box::new(service));

        let result = registry
            .resolve_thumbnail(
                "http://elsewhere.example/post/1",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_matching_resolver_wins() {
        let info = ThumbnailInfo::new("http://site.example/a").with_thumbnail_url("http://t/1");
        let (first, first_calls) = StubService::new(r"http://site\.example/", Some(info.clone()));
        let (second, second_calls) = StubService::new(r"http://site\.example/", None);

        let mut registry = ThumbnailRegistry::new();
        registry.register(Box::new(first));
        registry.register(Box::new(second));

        let result = registry
            .resolve_thumbnail(
                "http://site.example/a",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result, Some(info));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declining_match_does_not_fall_through() {
        let (first, _) = StubService::new(r"http://site\.example/", None);
        let backup = ThumbnailInfo::new("x").with_thumbnail_url("http://t/2");
        let (second, second_calls) = StubService::new(r"http://site\.example/", Some(backup));

        let mut registry = ThumbnailRegistry::new();
        registry.register(Box::new(first));
        registry.register(Box::new(second));

        let result = registry
            .resolve_thumbnail(
                "http://site.example/a",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;

        assert!(result.is_none());
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_registry_resolves_to_none() {
        let registry = ThumbnailRegistry::new();
        assert!(registry.is_empty());

        let result = registry
            .resolve_thumbnail(
                "http://anything.example/",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;
        assert!(result.is_none());
    }
}
