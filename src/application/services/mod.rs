//! Application service implementations.

mod thumbnail_registry;

pub use thumbnail_registry::ThumbnailRegistry;
