//! Port definition for the list view owning image-bound rows.

/// Port through which a row binding talks to its owning list view.
///
/// Mirrors what a virtualized list widget can answer about itself without the
/// binding holding the widget: liveness, the currently addressable row range,
/// and targeted redraw/notification requests. Implementations are consulted
/// on the UI-affine queue only.
#[cfg_attr(test, mockall::automock)]
pub trait RowHost: Send + Sync {
    /// True while the view exists and has not been torn down.
    fn is_attached(&self) -> bool;

    /// Number of rows currently addressable in the view.
    fn row_count(&self) -> usize;

    /// Requests a redraw of a single row.
    fn redraw_row(&self, index: usize);

    /// Notifies observers that a row's image finished downloading.
    fn image_downloaded(&self, index: usize);
}
