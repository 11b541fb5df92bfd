//! Application layer: the gallery scraping pipeline
//!
//! Orchestrates domain rules and infrastructure services per catalog row.

pub mod gallery_fetcher;
pub mod scrape_use_cases;

pub use gallery_fetcher::GalleryFetcher;
pub use scrape_use_cases::{BatchReport, GalleryScraper, LevelPlan, RowReport, plan_levels};
