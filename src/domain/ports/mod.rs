//! Port definitions.

mod fetch_port;
mod row_host;
mod thumbnail_port;

pub use fetch_port::{FetchBytes, ProgressSender};
pub use row_host::RowHost;
pub use thumbnail_port::ThumbnailService;

#[cfg(test)]
pub use fetch_port::MockFetchBytes;
#[cfg(test)]
pub use row_host::MockRowHost;
