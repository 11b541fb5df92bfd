//! Dry run for a single gallery page
//!
//! Fetches one page and prints, per level, the deduplicated images and the
//! file stems they would be saved under. Nothing is downloaded.

use anyhow::Result;
use clap::Parser;
use wiki_gallery_scraper_lib::{
    CatalogRow,
    application::{GalleryFetcher, plan_levels},
    domain::NamingConvention,
    infrastructure::{HttpClient, HttpClientConfig},
};

#[derive(Parser)]
#[command(
    name = "gallery_probe",
    about = "List the images a gallery page would yield per level, without downloading",
    version
)]
struct Cli {
    /// Wiki page hosting the gallery.
    page_url: String,

    /// Image key prefix, e.g. `Cannon`.
    identifier_key: String,

    /// Number of levels to list, starting at 1.
    levels: u32,

    /// Naming variant suffix, e.g. `-alt`.
    #[arg(allow_hyphen_values = true)]
    variant: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::init();

    let row = CatalogRow::new(cli.identifier_key, cli.page_url, cli.levels, cli.variant);
    let naming = NamingConvention::for_row(&row);

    let fetcher = GalleryFetcher::new(HttpClient::new(HttpClientConfig::default())?);
    let gallery = fetcher.fetch_gallery(&row.page_url, &naming).await;

    println!("🔎 {} gallery images matched {}", gallery.len(), naming.identifier_key());

    for plan in plan_levels(&gallery, &naming, row.levels())? {
        println!("Level {} ({} images) -> {}", plan.level, plan.images.len(), naming.level_dir_name(plan.level));
        for (index, descriptor) in plan.images {
            println!(
                "  {} <- {} [{}]",
                naming.file_stem(plan.level, index),
                descriptor.identifier_key,
                descriptor.source_url.as_deref().unwrap_or("no source")
            );
        }
    }

    Ok(())
}
