//! Application layer with resolver dispatch services.

/// Service implementations.
pub mod services;

pub use services::ThumbnailRegistry;
