//! Standalone picture loader for a detail pane.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::entities::FetchProgress;
use crate::domain::errors::{MediaError, MediaResult};
use crate::domain::ports::FetchBytes;
use crate::presentation::UiContext;

/// Display state of a [`PictureView`].
#[derive(Debug, Clone, Default)]
pub enum PictureState {
    /// Nothing loaded yet; the view shows its initial placeholder.
    #[default]
    Initial,
    /// Transfer in progress.
    Loading(FetchProgress),
    /// Decoded image ready for drawing.
    Ready(Arc<image::DynamicImage>),
    /// Load failed; the view shows its error placeholder.
    Error,
}

impl PictureState {
    /// Returns true once an image is ready for drawing.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Loads one picture at a time with progress reporting and an explicit
/// cancel-and-wait teardown.
///
/// Unlike row bindings, the view owns its fetch chain exclusively, so
/// replacing the picture first cancels the in-flight load and waits for it to
/// unwind. Cancellation never changes the currently displayed image.
pub struct PictureView {
    fetcher: Arc<dyn FetchBytes>,
    ui: UiContext,
    state: Arc<Mutex<PictureState>>,
    in_flight: Option<(CancellationToken, JoinHandle<MediaResult<()>>)>,
}

impl PictureView {
    /// Creates an empty view.
    #[must_use]
    pub fn new(fetcher: Arc<dyn FetchBytes>, ui: UiContext) -> Self {
        Self {
            fetcher,
            ui,
            state: Arc::new(Mutex::new(PictureState::Initial)),
            in_flight: None,
        }
    }

    /// Current display state.
    #[must_use]
    pub fn state(&self) -> PictureState {
        self.state.lock().clone()
    }

    /// Starts loading `url`, first cancelling and waiting out any load still
    /// in flight.
    ///
    /// The outcome of the new load is published through the UI queue as state
    /// transitions; the returned error reflects only the teardown of the
    /// previous load.
    ///
    /// # Errors
    /// Re-raises an unexpected failure from the superseded load, per
    /// [`cancel_and_wait`](Self::cancel_and_wait).
    pub async fn load(&mut self, url: impl Into<String>) -> MediaResult<()> {
        self.cancel_and_wait().await?;

        let url = url.into();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);
        let ui = self.ui.clone();

        {
            let state = Arc::clone(&self.state);
            self.ui.run(move || *state.lock() = PictureState::Initial);
        }

        let handle = tokio::spawn(async move {
            let (progress_tx, progress_rx) = mpsc::unbounded_channel();
            pump_progress(progress_rx, Arc::clone(&state), ui.clone());

            let result = fetch_and_decode(fetcher.as_ref(), &url, &token, progress_tx).await;

            match result {
                Ok(img) => {
                    let state = Arc::clone(&state);
                    ui.run(move || *state.lock() = PictureState::Ready(img));
                    Ok(())
                }
                // A cancelled load leaves whatever was displayed untouched.
                Err(MediaError::Cancelled) => Err(MediaError::Cancelled),
                Err(e) => {
                    debug!(url, error = %e, "picture load failed");
                    let state = Arc::clone(&state);
                    ui.run(move || *state.lock() = PictureState::Error);
                    Err(e)
                }
            }
        });

        self.in_flight = Some((cancel, handle));
        Ok(())
    }

    /// Cooperatively cancels the in-flight load and waits for the chain to
    /// unwind.
    ///
    /// # Errors
    /// Cancellation and transport aborts are normal outcomes here and are
    /// swallowed; anything else is re-raised.
    pub async fn cancel_and_wait(&mut self) -> MediaResult<()> {
        let Some((cancel, handle)) = self.in_flight.take() else {
            return Ok(());
        };

        cancel.cancel();
        match handle.await {
            Ok(Ok(())) | Ok(Err(MediaError::Cancelled | MediaError::Fetch { .. })) => Ok(()),
            Ok(Err(unexpected)) => Err(unexpected),
            Err(e) => Err(MediaError::fetch(format!("load task panicked: {e}"))),
        }
    }
}

impl std::fmt::Debug for PictureView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureView")
            .field("loading", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

/// Forwards transfer progress onto the UI queue while a load is running.
/// Progress never overwrites a terminal state.
fn pump_progress(
    mut rx: mpsc::UnboundedReceiver<FetchProgress>,
    state: Arc<Mutex<PictureState>>,
    ui: UiContext,
) {
    tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            let state = Arc::clone(&state);
            ui.run(move || {
                let mut state = state.lock();
                if matches!(*state, PictureState::Initial | PictureState::Loading(_)) {
                    *state = PictureState::Loading(progress);
                }
            });
        }
    });
}

async fn fetch_and_decode(
    fetcher: &dyn FetchBytes,
    url: &str,
    cancel: &CancellationToken,
    progress: mpsc::UnboundedSender<FetchProgress>,
) -> MediaResult<Arc<image::DynamicImage>> {
    let bytes = fetcher
        .fetch_with_progress(url, cancel, Some(progress))
        .await?;

    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| MediaError::invalid_image(format!("decode task panicked: {e}")))?
        .map_err(|e| MediaError::invalid_image(format!("failed to decode image: {e}")))?;

    Ok(Arc::new(decoded))
}
