//! Tumblr post thumbnail resolver.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::entities::{ResolveContext, ThumbnailInfo};
use crate::domain::ports::{FetchBytes, ThumbnailService};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<base>https?://[^/]+?\.tumblr\.com/)post/(?<post_id>[0-9]+)(/(?<subject>[^/]+?)/)?")
        .unwrap()
});

/// Resolves thumbnails for Tumblr post URLs via the v1 `api/read` endpoint.
///
/// The post URL's named captures template the API request; the response is an
/// XML document whose post node declares a `type` attribute. Only `photo`
/// posts carry a thumbnail (in the `photo-url` node); every other type, and
/// every parse problem, resolves to `None`.
pub struct TumblrThumbnailService {
    fetcher: Arc<dyn FetchBytes>,
}

impl TumblrThumbnailService {
    /// Creates the resolver backed by the given fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<dyn FetchBytes>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl ThumbnailService for TumblrThumbnailService {
    fn url_pattern(&self) -> &Regex {
        &URL_PATTERN
    }

    async fn resolve(
        &self,
        url: &str,
        _ctx: &ResolveContext,
        cancel: &CancellationToken,
    ) -> Option<ThumbnailInfo> {
        let caps = URL_PATTERN.captures(url)?;
        let api_url = format!("{}api/read?id={}", &caps["base"], &caps["post_id"]);

        let body = match self.fetcher.fetch(&api_url, cancel).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url, error = %e, "tumblr api fetch failed");
                return None;
            }
        };

        let body = String::from_utf8_lossy(&body);
        let thumbnail_url = extract_photo_url(&body)?;

        Some(ThumbnailInfo::new(url).with_thumbnail_url(thumbnail_url))
    }
}

/// Pulls the photo URL out of an `api/read` response when the post type is
/// `photo`. Schema surprises of any kind yield `None`.
fn extract_photo_url(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let post_selector = Selector::parse("post").ok()?;
    let photo_selector = Selector::parse("photo-url").ok()?;

    let post = document.select(&post_selector).next()?;
    let post_type = post.value().attr("type")?;
    if post_type != "photo" {
        debug!(post_type, "tumblr post carries no photo");
        return None;
    }

    let photo_url = post.select(&photo_selector).next()?;
    let text = photo_url.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::ports::MockFetchBytes;

    const PHOTO_XML: &str = "<tumblr><posts><post type=\"photo\">\
        <photo-url>http://img/x.jpg</photo-url></post></posts></tumblr>";

    #[test_case("http://foo.tumblr.com/post/123/bar/", "http://foo.tumblr.com/", "123"; "with subject")]
    #[test_case("http://foo.tumblr.com/post/456", "http://foo.tumblr.com/", "456"; "bare post id")]
    #[test_case("https://foo.tumblr.com/post/789/", "https://foo.tumblr.com/", "789"; "https scheme")]
    fn test_url_pattern_captures(url: &str, base: &str, post_id: &str) {
        let caps = URL_PATTERN.captures(url).unwrap();
        assert_eq!(&caps["base"], base);
        assert_eq!(&caps["post_id"], post_id);
    }

    #[test]
    fn test_subject_capture() {
        let caps = URL_PATTERN
            .captures("http://foo.tumblr.com/post/123/bar/")
            .unwrap();
        assert_eq!(caps.name("subject").map(|m| m.as_str()), Some("bar"));
    }

    #[test]
    fn test_pattern_rejects_other_hosts() {
        assert!(!URL_PATTERN.is_match("http://example.com/post/123/"));
    }

    #[test]
    fn test_extract_photo_url() {
        assert_eq!(
            extract_photo_url(PHOTO_XML).as_deref(),
            Some("http://img/x.jpg")
        );
    }

    #[test]
    fn test_extract_declines_non_photo_post() {
        let xml = "<tumblr><posts><post type=\"quote\">\
            <quote-text>words</quote-text></post></posts></tumblr>";
        assert_eq!(extract_photo_url(xml), None);
    }

    #[test]
    fn test_extract_survives_malformed_xml() {
        assert_eq!(extract_photo_url("<<<this is not xml"), None);
        assert_eq!(extract_photo_url(""), None);
    }

    #[test]
    fn test_extract_requires_type_attribute() {
        let xml = "<tumblr><posts><post>\
            <photo-url>http://img/x.jpg</photo-url></post></posts></tumblr>";
        assert_eq!(extract_photo_url(xml), None);
    }

    #[tokio::test]
    async fn test_resolve_fetches_templated_api_url() {
        let mut fetcher = MockFetchBytes::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url == "http://foo.tumblr.com/api/read?id=123")
            .returning(|_, _| Ok(bytes::Bytes::from_static(PHOTO_XML.as_bytes())));

        let service = TumblrThumbnailService::new(Arc::new(fetcher));
        let info = service
            .resolve(
                "http://foo.tumblr.com/post/123/bar/",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(info.image_url, "http://foo.tumblr.com/post/123/bar/");
        assert_eq!(info.thumbnail_url.as_deref(), Some("http://img/x.jpg"));
        assert_eq!(info.tooltip_text, None);
    }

    #[tokio::test]
    async fn test_resolve_normalizes_fetch_failure_to_none() {
        let mut fetcher = MockFetchBytes::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(crate::domain::errors::MediaError::fetch("boom")));

        let service = TumblrThumbnailService::new(Arc::new(fetcher));
        let info = service
            .resolve(
                "http://foo.tumblr.com/post/123/",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;

        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_resolve_normalizes_cancellation_to_none() {
        let mut fetcher = MockFetchBytes::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(crate::domain::errors::MediaError::Cancelled));

        let service = TumblrThumbnailService::new(Arc::new(fetcher));
        let info = service
            .resolve(
                "http://foo.tumblr.com/post/123/",
                &ResolveContext::new(),
                &CancellationToken::new(),
            )
            .await;

        assert!(info.is_none());
    }
}
