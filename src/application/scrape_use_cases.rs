//! Catalog scraping use cases
//!
//! Row by row, level by level, image by image. Every failure below the
//! catalog level is logged and counted; the batch always runs to the end.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::gallery_fetcher::GalleryFetcher;
use crate::domain::catalog::CatalogRow;
use crate::domain::gallery::{ImageDescriptor, dedupe, filter_by_level};
use crate::domain::naming::NamingConvention;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::image_downloader::{DownloadOutcome, ImageDownloader};
use crate::infrastructure::scrape_error::ScrapeResult;
use crate::infrastructure::throttle::{self, Throttle};

/// Images selected for one level, each with its 1-based sequential index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    pub level: u32,
    pub images: Vec<(usize, ImageDescriptor)>,
}

/// Partition a gallery into per-level, deduplicated, numbered image lists
pub fn plan_levels(
    gallery: &[ImageDescriptor],
    naming: &NamingConvention,
    levels: impl IntoIterator<Item = u32>,
) -> ScrapeResult<Vec<LevelPlan>> {
    levels
        .into_iter()
        .map(|level| -> ScrapeResult<LevelPlan> {
            let pattern = naming.level_pattern(level)?;
            let images = dedupe(filter_by_level(gallery, &pattern))
                .into_iter()
                .enumerate()
                .map(|(i, descriptor)| (i + 1, descriptor))
                .collect();
            Ok(LevelPlan { level, images })
        })
        .collect()
}

/// Per-row counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowReport {
    pub identifier_key: String,
    pub gallery_size: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Matched elements without any usable source URL
    pub missing_source: usize,
}

/// Whole-catalog counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rows: Vec<RowReport>,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    fn record(&mut self, row: RowReport) {
        self.saved += row.saved;
        self.skipped += row.skipped;
        self.failed += row.failed;
        self.rows.push(row);
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows processed: {} saved, {} skipped, {} failed",
            self.rows.len(),
            self.saved,
            self.skipped,
            self.failed
        )
    }
}

/// Drives the fetch → partition → download pipeline over a catalog
pub struct GalleryScraper {
    fetcher: GalleryFetcher,
    downloader: ImageDownloader,
}

impl GalleryScraper {
    pub fn new(fetcher: GalleryFetcher, downloader: ImageDownloader) -> Self {
        Self { fetcher, downloader }
    }

    /// Wire up the scraper from configuration
    pub fn from_config(config: &AppConfig) -> ScrapeResult<Self> {
        let throttle = throttle::from_config(&config.throttle)?;
        Self::with_throttle(config, throttle)
    }

    /// Same as [`Self::from_config`] with an explicit throttle
    pub fn with_throttle(config: &AppConfig, throttle: Arc<dyn Throttle>) -> ScrapeResult<Self> {
        let http = HttpClient::new(config.http.clone())?;
        let fetcher = GalleryFetcher::new(http.clone());
        let downloader = ImageDownloader::new(http, config.scraper.base_dir.clone(), throttle);
        Ok(Self::new(fetcher, downloader))
    }

    /// Process every row in order; never stops early
    pub async fn scrape_catalog(&self, rows: &[CatalogRow]) -> BatchReport {
        let mut report = BatchReport::default();

        for row in rows {
            info!("🔎 Fetching and downloading {} images...", row.identifier_key);
            report.record(self.process_row(row).await);
        }

        info!("✅ All catalog images processed: {}", report.summary());
        report
    }

    /// Fetch one row's gallery and download every level's images
    pub async fn process_row(&self, row: &CatalogRow) -> RowReport {
        let naming = NamingConvention::for_row(row);
        let mut report = RowReport {
            identifier_key: row.identifier_key.clone(),
            ..RowReport::default()
        };

        let gallery = self.fetcher.fetch_gallery(&row.page_url, &naming).await;
        report.gallery_size = gallery.len();
        if gallery.is_empty() {
            return report;
        }

        let plans = match plan_levels(&gallery, &naming, row.levels()) {
            Ok(plans) => plans,
            Err(e) => {
                warn!("Skipping {}: {}", row.identifier_key, e);
                return report;
            }
        };

        for plan in plans {
            if plan.images.is_empty() {
                warn!("❌ No {} level {} images found!", row.identifier_key, plan.level);
                continue;
            }

            for (index, descriptor) in plan.images {
                self.download_one(&naming, plan.level, index, &descriptor, &mut report)
                    .await;
            }
        }

        info!(
            "{}: {} saved, {} skipped, {} failed",
            report.identifier_key, report.saved, report.skipped, report.failed
        );
        report
    }

    async fn download_one(
        &self,
        naming: &NamingConvention,
        level: u32,
        index: usize,
        descriptor: &ImageDescriptor,
        report: &mut RowReport,
    ) {
        let label = naming.file_stem(level, index);

        // A file saved by an earlier run counts as skipped even without a source
        let Some(source_url) = descriptor.source_url.as_deref() else {
            match self.downloader.existing(naming, level, index).await {
                Ok(Some(path)) => {
                    info!("✅ Skipped {} due to the image already existing ({})", label, path.display());
                    report.skipped += 1;
                }
                Ok(None) => {
                    warn!("No image source for {} ({})", label, descriptor.identifier_key);
                    report.missing_source += 1;
                }
                Err(e) => {
                    warn!("❌ Failed to check {} image: {}", label, e);
                    report.failed += 1;
                }
            }
            return;
        };

        match self.downloader.download(source_url, naming, level, index).await {
            Ok(DownloadOutcome::Saved(_)) => report.saved += 1,
            Ok(DownloadOutcome::Skipped(path)) => {
                info!("✅ Skipped {} due to the image already existing ({})", label, path.display());
                report.skipped += 1;
            }
            Err(e) if e.is_recoverable() => {
                warn!("❌ Failed to download {} image: {}", label, e);
                report.failed += 1;
            }
            Err(e) => {
                error!("❌ Unexpected error while downloading {} image: {}", label, e);
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(keys: &[&str]) -> Vec<ImageDescriptor> {
        keys.iter()
            .map(|k| ImageDescriptor::new(*k, Some(format!("https://cdn.example/{k}"))))
            .collect()
    }

    #[test]
    fn plan_numbers_each_level_from_one() {
        let naming = NamingConvention::new("Cannon", None);
        let gallery = gallery(&[
            "Cannon1.png",
            "Cannon2.png",
            "Cannon1-2.png",
            "Cannon1.png",
            "Cannon2-2.png",
            "Cannon1-3.png",
        ]);

        let plans = plan_levels(&gallery, &naming, 1..=2).unwrap();
        assert_eq!(plans.len(), 2);

        let level_one: Vec<_> = plans[0]
            .images
            .iter()
            .map(|(i, d)| (*i, d.identifier_key.as_str()))
            .collect();
        assert_eq!(
            level_one,
            vec![(1, "Cannon1.png"), (2, "Cannon1-2.png"), (3, "Cannon1-3.png")]
        );
        assert_eq!(plans[1].images.len(), 2);
    }

    #[test]
    fn levels_without_images_have_empty_plans() {
        let naming = NamingConvention::new("Cannon", None);
        let plans = plan_levels(&gallery(&["Cannon1.png"]), &naming, 1..=3).unwrap();

        assert_eq!(plans.iter().map(|p| p.images.len()).collect::<Vec<_>>(), vec![1, 0, 0]);
    }

    #[test]
    fn batch_report_totals() {
        let mut batch = BatchReport::default();
        batch.record(RowReport {
            identifier_key: "Cannon".into(),
            saved: 2,
            skipped: 1,
            ..RowReport::default()
        });
        batch.record(RowReport {
            identifier_key: "Wall".into(),
            failed: 1,
            ..RowReport::default()
        });

        assert_eq!(batch.summary(), "2 rows processed: 2 saved, 1 skipped, 1 failed");
    }
}
