//! Display-layer adapters.

mod picture_view;
mod row_binding;

pub use picture_view::{PictureState, PictureView};
pub use row_binding::ImageRowBinding;
