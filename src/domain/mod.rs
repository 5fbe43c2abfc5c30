//! Domain layer with core media entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{FetchProgress, ImageKey, ResolveContext, ThumbnailInfo};
pub use errors::{MediaError, MediaResult};
pub use ports::{FetchBytes, RowHost, ThumbnailService};
