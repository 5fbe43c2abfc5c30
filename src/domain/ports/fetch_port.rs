//! Port definition for raw byte retrieval.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::FetchProgress;
use crate::domain::errors::MediaResult;

/// Sender half used to report transfer progress.
pub type ProgressSender = mpsc::UnboundedSender<FetchProgress>;

/// Port for cancellable retrieval of raw bytes from a URL.
///
/// Implementations stop the transfer promptly once the token fires and report
/// [`MediaError::Cancelled`](crate::domain::errors::MediaError::Cancelled)
/// rather than a transport error. No caching, no decoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FetchBytes: Send + Sync {
    /// Fetches the body at `url`, reporting progress when a sender is given.
    async fn fetch_with_progress(
        &self,
        url: &str,
        cancel: &CancellationToken,
        progress: Option<ProgressSender>,
    ) -> MediaResult<Bytes>;

    /// Fetches without progress reporting.
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> MediaResult<Bytes> {
        self.fetch_with_progress(url, cancel, None).await
    }
}
