//! Presentation layer with the UI queue and display bindings.

/// UI-affine execution context.
pub mod ui_context;
/// Row and pane adapters.
pub mod widgets;

pub use ui_context::{UiContext, UiRunner, ui_channel};
pub use widgets::{ImageRowBinding, PictureState, PictureView};
