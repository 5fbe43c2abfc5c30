//! Asynchronous image cache with in-flight request deduplication.

use std::num::NonZeroUsize;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use lru::LruCache;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageKey;
use crate::domain::errors::{MediaError, MediaResult};
use crate::domain::ports::FetchBytes;

/// Default maximum number of cache entries (ready, failed, or in flight).
pub const DEFAULT_CAPACITY: usize = 256;

type SharedImage = Arc<image::DynamicImage>;
type SharedFetch = Shared<BoxFuture<'static, MediaResult<SharedImage>>>;

/// Configuration for [`ImageCache`].
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
    /// Maximum number of entries before LRU eviction.
    pub capacity: usize,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

enum CacheEntry {
    /// Fetch in flight; waiters attach to the shared future.
    Pending(SharedFetch),
    /// Decoded image, never mutated in place.
    Ready(SharedImage),
    /// Fetch or decode failed; the next request retries.
    Failed,
}

/// Process-lifetime cache of decoded images keyed by normalized URL.
///
/// Concurrent non-forced requests for the same key share one network fetch.
/// A forced refresh always starts a new fetch and atomically replaces the
/// entry on success; the previous `Ready` image keeps serving readers until
/// the replacement lands. Entries beyond capacity are evicted LRU-first,
/// dropping the cache's strong reference; rows holding weak references
/// degrade to a re-fetch.
pub struct ImageCache {
    entries: Arc<Mutex<LruCache<ImageKey, CacheEntry>>>,
    fetcher: Arc<dyn FetchBytes>,
}

impl ImageCache {
    /// Creates a cache backed by the given fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<dyn FetchBytes>, config: &ImageCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            fetcher,
        }
    }

    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity(fetcher: Arc<dyn FetchBytes>) -> Self {
        Self::new(fetcher, &ImageCacheConfig::default())
    }

    /// Synchronous, I/O-free cache probe.
    ///
    /// Returns the `Ready` image for `url` or `None` otherwise, including
    /// while a fetch for the key is still in flight.
    #[must_use]
    pub fn try_get_from_cache(&self, url: &str) -> Option<SharedImage> {
        let key = ImageKey::new(url);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(CacheEntry::Ready(img)) => Some(Arc::clone(img)),
            _ => None,
        }
    }

    /// Downloads and decodes the image at `url`.
    ///
    /// With `force == false` an in-flight fetch for the same key is joined
    /// instead of duplicated, and a `Ready` entry is returned without network
    /// access. With `force == true` a new fetch always starts, replacing the
    /// entry when it completes.
    ///
    /// # Errors
    /// [`MediaError::Fetch`] on transport failure,
    /// [`MediaError::InvalidImageFormat`] when the bytes do not decode, and
    /// [`MediaError::Cancelled`] when the caller's token fires. Cancellation
    /// detaches only this caller; the underlying fetch keeps running for any
    /// other waiters and never marks the entry `Failed`.
    pub async fn download_image(
        &self,
        url: &str,
        force: bool,
        cancel: &CancellationToken,
    ) -> MediaResult<SharedImage> {
        let key = ImageKey::new(url);

        let fetch = {
            let mut entries = self.entries.lock();

            if !force {
                match entries.get(&key) {
                    Some(CacheEntry::Ready(img)) => return Ok(Arc::clone(img)),
                    Some(CacheEntry::Pending(fetch)) => {
                        trace!(url, "joining in-flight fetch");
                        fetch.clone()
                    }
                    _ => self.start_fetch(&mut entries, key),
                }
            } else {
                self.start_fetch(&mut entries, key)
            }
        };

        tokio::select! {
            () = cancel.cancelled() => Err(MediaError::Cancelled),
            result = fetch => result,
        }
    }

    /// Number of entries currently tracked (ready, failed, or in flight).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. Fetches already in flight finish and re-insert
    /// their own result.
    pub fn clear(&self) {
        self.entries.lock().clear();
        debug!("cleared image cache");
    }

    /// Spawns the fetch task and registers it as the key's pending entry,
    /// unless a `Ready` image should keep serving readers until the forced
    /// replacement lands.
    fn start_fetch(
        &self,
        entries: &mut LruCache<ImageKey, CacheEntry>,
        key: ImageKey,
    ) -> SharedFetch {
        let fetch = spawn_fetch(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.entries),
            key.clone(),
        );
        if !matches!(entries.peek(&key), Some(CacheEntry::Ready(_))) {
            entries.put(key, CacheEntry::Pending(fetch.clone()));
        }
        fetch
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

fn spawn_fetch(
    fetcher: Arc<dyn FetchBytes>,
    entries: Arc<Mutex<LruCache<ImageKey, CacheEntry>>>,
    key: ImageKey,
) -> SharedFetch {
    let handle = tokio::spawn(async move {
        let result = fetch_and_decode(fetcher.as_ref(), key.as_str()).await;
        {
            let mut entries = entries.lock();
            match &result {
                Ok(img) => {
                    debug!(url = key.as_str(), "image cached");
                    entries.put(key, CacheEntry::Ready(Arc::clone(img)));
                }
                Err(MediaError::Cancelled) => {
                    // Detach the pending slot so the next request retries,
                    // without touching a Ready entry that may have landed.
                    if matches!(entries.peek(&key), Some(CacheEntry::Pending(_))) {
                        entries.pop(&key);
                    }
                }
                Err(e) => {
                    warn!(url = key.as_str(), error = %e, "image fetch failed");
                    entries.put(key, CacheEntry::Failed);
                }
            }
        }
        result
    });

    handle
        .map(|joined| {
            joined.unwrap_or_else(|e| Err(MediaError::fetch(format!("fetch task panicked: {e}"))))
        })
        .boxed()
        .shared()
}

async fn fetch_and_decode(fetcher: &dyn FetchBytes, url: &str) -> MediaResult<SharedImage> {
    // The shared fetch owns its token; individual waiters detach via their
    // own tokens in download_image.
    let token = CancellationToken::new();
    let bytes = fetcher.fetch(url, &token).await?;

    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| MediaError::invalid_image(format!("decode task panicked: {e}")))?
        .map_err(|e| MediaError::invalid_image(format!("failed to decode image: {e}")))?;

    Ok(Arc::new(decoded))
}
