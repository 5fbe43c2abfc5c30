//! Domain entity definitions.

mod fetch_progress;
mod image_key;
mod thumbnail;

pub use fetch_progress::FetchProgress;
pub use image_key::ImageKey;
pub use thumbnail::{ResolveContext, ThumbnailInfo};
