//! HTML parsing for wiki gallery pages
//!
//! Picks `img[data-image-key]` elements whose key matches the family's
//! gallery pattern and turns them into [`ImageDescriptor`]s.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::domain::gallery::ImageDescriptor;

/// Attribute carrying the structured image identifier
pub const IDENTIFIER_ATTR: &str = "data-image-key";

/// Lazy-loaded source attribute, preferred over `src`
pub const LAZY_SOURCE_ATTR: &str = "data-src";

/// Extracts gallery descriptors from page HTML
pub struct GalleryParser {
    image_selector: Selector,
}

impl GalleryParser {
    pub fn new() -> Self {
        Self {
            image_selector: Selector::parse("img[data-image-key]")
                .expect("static selector is valid"),
        }
    }

    /// Parse `html` and keep images whose identifier matches `pattern`
    ///
    /// Relative sources are resolved against `page_url` when it parses.
    pub fn extract_images(&self, html: &str, page_url: &str, pattern: &Regex) -> Vec<ImageDescriptor> {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        let images: Vec<ImageDescriptor> = document
            .select(&self.image_selector)
            .filter_map(|element| {
                let attrs = element.value();
                let key = attrs.attr(IDENTIFIER_ATTR)?;
                if !pattern.is_match(key) {
                    return None;
                }

                let source = attrs
                    .attr(LAZY_SOURCE_ATTR)
                    .or_else(|| attrs.attr("src"))
                    .filter(|s| !s.trim().is_empty() && !s.starts_with("data:"))
                    .map(|s| resolve_url(base.as_ref(), s.trim()));

                Some(ImageDescriptor::new(key, source))
            })
            .collect();

        debug!("Extracted {} gallery images from {}", images.len(), page_url);
        images
    }
}

impl Default for GalleryParser {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_url(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map_or_else(|_| href.to_string(), |url| url.to_string()),
        None => href.to_string(),
    }
}
