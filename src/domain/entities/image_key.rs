//! Cache key for remote images.

/// Cache key derived from an image URL.
///
/// Keys are normalized so the display layer can probe the cache with the same
/// string the binding was constructed from: leading and trailing ASCII
/// whitespace is stripped, nothing else is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a key from a URL, applying normalization.
    #[must_use]
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(url.as_ref().trim_ascii().to_owned())
    }

    /// Returns the normalized URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
