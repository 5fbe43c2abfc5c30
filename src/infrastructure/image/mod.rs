//! Image caching infrastructure.

mod cache;

pub use cache::{DEFAULT_CAPACITY, ImageCache, ImageCacheConfig};
