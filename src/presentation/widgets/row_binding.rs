//! Per-row binding between a list row and the image cache.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::domain::ports::RowHost;
use crate::infrastructure::image::ImageCache;
use crate::presentation::UiContext;

/// Connects one visible row to a cache-backed image.
///
/// The binding holds only a weak reference to the decoded image; the cache
/// owns the image's lifetime while it is ready or in flight. Completions are
/// delivered through the UI queue and discarded when the owning view has gone
/// away or the row left the addressable range, so stale populations can never
/// touch a recycled row.
pub struct ImageRowBinding {
    image_url: String,
    index: usize,
    cache: Arc<ImageCache>,
    host: Arc<dyn RowHost>,
    ui: UiContext,
    image_ref: Mutex<Weak<image::DynamicImage>>,
}

impl ImageRowBinding {
    /// Creates the binding, probing the cache synchronously and starting an
    /// async population on a miss. A hit binds immediately with no network
    /// access.
    pub fn new(
        image_url: impl Into<String>,
        index: usize,
        cache: Arc<ImageCache>,
        host: Arc<dyn RowHost>,
        ui: UiContext,
    ) -> Arc<Self> {
        let binding = Arc::new(Self {
            image_url: image_url.into(),
            index,
            cache,
            host,
            ui,
            image_ref: Mutex::new(Weak::new()),
        });

        if binding.image_url.is_empty() {
            return binding;
        }

        if let Some(img) = binding.cache.try_get_from_cache(&binding.image_url) {
            *binding.image_ref.lock() = Arc::downgrade(&img);
        } else {
            binding.populate(false);
        }

        binding
    }

    /// Currently bound image, if the cache still holds it.
    #[must_use]
    pub fn image(&self) -> Option<Arc<image::DynamicImage>> {
        self.image_ref.lock().upgrade()
    }

    /// Row index this binding serves.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// URL of the image this row shows.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Clears the bound image and re-populates with a forced fetch, even when
    /// a valid cached image exists.
    pub fn refresh_image(self: &Arc<Self>) {
        *self.image_ref.lock() = Weak::new();
        self.populate(true);
    }

    fn populate(self: &Arc<Self>, force: bool) {
        let binding = Arc::clone(self);
        tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let result = binding
                .cache
                .download_image(&binding.image_url, force, &cancel)
                .await;

            // Cancellations and decode failures degrade to the placeholder;
            // nothing is surfaced to the observer.
            let Ok(img) = result else {
                trace!(url = %binding.image_url, "image population failed");
                return;
            };

            let completed = Arc::clone(&binding);
            binding.ui.run(move || completed.finish_population(&img));
        });
    }

    /// Runs on the UI queue. Discards the result when the view went away or
    /// the row scrolled out of the addressable range.
    fn finish_population(&self, img: &Arc<image::DynamicImage>) {
        if !self.host.is_attached() || self.index >= self.host.row_count() {
            trace!(index = self.index, "discarding stale image completion");
            return;
        }

        *self.image_ref.lock() = Arc::downgrade(img);
        self.host.redraw_row(self.index);
        self.host.image_downloaded(self.index);
    }
}

impl std::fmt::Debug for ImageRowBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRowBinding")
            .field("image_url", &self.image_url)
            .field("index", &self.index)
            .field("bound", &(self.image_ref.lock().strong_count() > 0))
            .finish_non_exhaustive()
    }
}
