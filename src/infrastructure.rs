//! Infrastructure layer: HTTP, HTML parsing, filesystem, configuration and logging

pub mod catalog_loader;
pub mod config;
pub mod gallery_parser;
pub mod http_client;
pub mod image_downloader;
pub mod logging;
pub mod scrape_error;
pub mod throttle;

// Re-export commonly used items
pub use catalog_loader::{load_catalog, parse_catalog};
pub use config::{AppConfig, HttpClientConfig, LoggingConfig, ThrottleConfig, ThrottleStrategy};
pub use gallery_parser::GalleryParser;
pub use http_client::HttpClient;
pub use image_downloader::{DownloadOutcome, ImageDownloader};
pub use logging::init_logging_with_config;
pub use scrape_error::{ScrapeError, ScrapeResult};
pub use throttle::{FixedDelay, NoThrottle, Throttle, TokenBucket};
