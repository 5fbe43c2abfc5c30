//! Transfer progress reporting.

/// Byte-level progress of one network transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Bytes received so far.
    pub received: u64,
    /// Declared body length, when the server sent one.
    pub total: Option<u64>,
}

impl FetchProgress {
    /// Completed fraction in `0.0..=1.0`, if the total is known and non-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.received as f64 / total as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_with_known_total() {
        let progress = FetchProgress {
            received: 50,
            total: Some(200),
        };
        assert_eq!(progress.fraction(), Some(0.25));
    }

    #[test]
    fn test_fraction_unknown_total() {
        let progress = FetchProgress {
            received: 50,
            total: None,
        };
        assert_eq!(progress.fraction(), None);
    }
}
