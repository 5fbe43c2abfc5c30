//! Infrastructure layer with network, cache, and provider adapters.

/// HTTP transport.
pub mod http;
/// Image caching.
pub mod image;
/// Thumbnail providers.
pub mod thumbnail;

pub use http::{Fetcher, FetcherConfig};
pub use image::{DEFAULT_CAPACITY, ImageCache, ImageCacheConfig};
pub use thumbnail::{TumblrThumbnailService, default_registry};
