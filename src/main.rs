//! Batch entry point: downloads every catalog row's gallery images

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wiki_gallery_scraper_lib::{
    AppConfig, GalleryScraper,
    infrastructure::{load_catalog, logging},
};

#[derive(Parser)]
#[command(
    name = "wiki-gallery-scraper",
    about = "Download level-tagged wiki gallery images for every catalog row",
    version
)]
struct Cli {
    /// Config file (TOML, JSON or YAML). Defaults to `wiki-gallery-scraper.*` when present.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Flushes the file log on drop; keep it alive until main returns.
    let _log_guard =
        logging::init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    logging::log_system_info();
    info!(
        "Loaded configuration (catalog={:?}, base_dir={:?}, throttle={:?})",
        config.scraper.catalog_path, config.scraper.base_dir, config.throttle.strategy
    );

    let rows = load_catalog(&config.scraper.catalog_path)
        .with_context(|| format!("Failed to load catalog {:?}", config.scraper.catalog_path))?;

    let scraper = GalleryScraper::from_config(&config)?;
    let report = scraper.scrape_catalog(&rows).await;

    info!("✅ All item images downloaded: {}", report.summary());
    Ok(())
}
