//! Media pipeline error types.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;

/// Errors produced by the fetch/decode pipeline.
///
/// Clone-able (message payloads only) so one fetch result can be broadcast to
/// every deduplicated waiter.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    /// Network or transport failure.
    #[error("fetch failed: {message}")]
    Fetch {
        /// Description of the transport failure.
        message: String,
    },

    /// Response body was not decodable as a raster image.
    #[error("invalid image format: {message}")]
    InvalidImageFormat {
        /// Description of the decode failure.
        message: String,
    },

    /// Cooperative cancellation; always benign.
    #[error("operation cancelled")]
    Cancelled,
}

impl MediaError {
    /// Creates a transport error.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImageFormat {
            message: message.into(),
        }
    }

    /// Returns true for cooperative cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MediaError::fetch("connection reset");
        assert_eq!(err.to_string(), "fetch failed: connection reset");
        assert!(!err.is_cancelled());
        assert!(MediaError::Cancelled.is_cancelled());
    }
}
