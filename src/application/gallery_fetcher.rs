//! Gallery fetching: one page request per catalog row
//!
//! Fails soft. A page that cannot be fetched, or that has no matching
//! images, yields an empty gallery and the row simply has nothing to do.

use tracing::{error, warn};

use crate::domain::gallery::ImageDescriptor;
use crate::domain::naming::NamingConvention;
use crate::infrastructure::gallery_parser::GalleryParser;
use crate::infrastructure::http_client::HttpClient;

pub struct GalleryFetcher {
    http: HttpClient,
    parser: GalleryParser,
}

impl GalleryFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            parser: GalleryParser::new(),
        }
    }

    /// Fetch `page_url` and return every image belonging to the naming family
    pub async fn fetch_gallery(&self, page_url: &str, naming: &NamingConvention) -> Vec<ImageDescriptor> {
        let pattern = match naming.gallery_pattern() {
            Ok(pattern) => pattern,
            Err(e) => {
                error!("Invalid gallery pattern for {}: {}", naming.identifier_key(), e);
                return Vec::new();
            }
        };

        let html = match self.http.get_page_html(page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("❌ Failed to fetch the wiki page: {}", e);
                return Vec::new();
            }
        };

        let gallery = self.parser.extract_images(&html, page_url, &pattern);
        if gallery.is_empty() {
            warn!(
                "❌ No {} images found on {}",
                naming.identifier_key(),
                page_url
            );
        }

        gallery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::HttpClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> GalleryFetcher {
        GalleryFetcher::new(HttpClient::new(HttpClientConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn not_found_page_yields_empty_gallery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let naming = NamingConvention::new("Cannon", None);
        let gallery = fetcher()
            .fetch_gallery(&format!("{}/wiki/Cannon", server.uri()), &naming)
            .await;
        assert!(gallery.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_yields_empty_gallery() {
        let naming = NamingConvention::new("Cannon", None);
        let gallery = fetcher().fetch_gallery("http://127.0.0.1:9/wiki/Cannon", &naming).await;
        assert!(gallery.is_empty());
    }

    #[tokio::test]
    async fn returns_matching_images() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Cannon"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<img data-image-key="Cannon1.png" data-src="https://cdn.example/Cannon1.png">
                   <img data-image-key="Archer1.png" data-src="https://cdn.example/Archer1.png">"#,
            ))
            .mount(&server)
            .await;

        let naming = NamingConvention::new("Cannon", None);
        let gallery = fetcher()
            .fetch_gallery(&format!("{}/wiki/Cannon", server.uri()), &naming)
            .await;

        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].identifier_key, "Cannon1.png");
    }
}
