//! Wiki Gallery Scraper - level-partitioned image harvesting
//!
//! Reads a catalog of item families, fetches each family's wiki gallery,
//! groups the tagged images by level and stores every unique image under
//! `items/<key>/<key>_<level>/`, skipping images already on disk.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{BatchReport, GalleryScraper, RowReport};
pub use domain::{CatalogRow, ImageDescriptor, NamingConvention};
pub use infrastructure::{AppConfig, ScrapeError, ScrapeResult};
