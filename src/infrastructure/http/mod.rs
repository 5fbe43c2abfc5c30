//! HTTP transport adapters.

mod fetcher;

pub use fetcher::{Fetcher, FetcherConfig};
