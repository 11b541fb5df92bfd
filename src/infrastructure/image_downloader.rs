//! Image downloading and storage
//!
//! Per image: `Candidate -> Skipped | Downloading -> Saved | Failed`.
//! Nothing is retried. The throttle pauses after every download attempt.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::domain::naming::{NamingConvention, strip_revision_suffix};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};
use crate::infrastructure::throttle::Throttle;

/// Suffix of in-flight files; never an image extension
const PARTIAL_SUFFIX: &str = ".part";

/// Terminal, non-failing states of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Downloaded and written to this path
    Saved(PathBuf),
    /// Already present at this path; no network I/O happened
    Skipped(PathBuf),
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved(path) | Self::Skipped(path) => path,
        }
    }
}

/// Downloads images into `<base_dir>/<key>/<key>_<level>[<variant>]/`
pub struct ImageDownloader {
    http: HttpClient,
    base_dir: PathBuf,
    throttle: Arc<dyn Throttle>,
}

impl ImageDownloader {
    pub fn new(http: HttpClient, base_dir: impl Into<PathBuf>, throttle: Arc<dyn Throttle>) -> Self {
        Self {
            http,
            base_dir: base_dir.into(),
            throttle,
        }
    }

    /// Path of an image already saved under this level and index, in any format
    pub async fn existing(
        &self,
        naming: &NamingConvention,
        level: u32,
        sequential_index: usize,
    ) -> ScrapeResult<Option<PathBuf>> {
        let level_dir = naming.level_dir(&self.base_dir, level);
        find_existing(&level_dir, &naming.file_stem(level, sequential_index)).await
    }

    /// Download one image unless a file with its stem already exists
    pub async fn download(
        &self,
        source_url: &str,
        naming: &NamingConvention,
        level: u32,
        sequential_index: usize,
    ) -> ScrapeResult<DownloadOutcome> {
        if let Some(existing) = self.existing(naming, level, sequential_index).await? {
            return Ok(DownloadOutcome::Skipped(existing));
        }

        let level_dir = naming.level_dir(&self.base_dir, level);
        let stem = naming.file_stem(level, sequential_index);

        let url = strip_revision_suffix(source_url);
        let result = self.fetch_and_save(url, &level_dir, &stem).await;
        self.throttle.pause().await;

        result.map(DownloadOutcome::Saved)
    }

    async fn fetch_and_save(&self, url: &str, level_dir: &Path, stem: &str) -> ScrapeResult<PathBuf> {
        tokio::fs::create_dir_all(level_dir)
            .await
            .map_err(|e| ScrapeError::filesystem(level_dir, e))?;

        let bytes = self.http.download_bytes(url).await?;

        let format = image::guess_format(&bytes).map_err(|e| decode_error(url, e))?;
        let decoded =
            image::load_from_memory_with_format(&bytes, format).map_err(|e| decode_error(url, e))?;
        debug!(
            "Decoded {:?} image {}x{} from {}",
            format,
            decoded.width(),
            decoded.height(),
            url
        );

        let path = level_dir.join(format!("{}.{}", stem, format_extension(format)));
        let encoded = encode_image(&decoded, format, &path)?;
        write_atomically(&path, encoded).await?;

        info!("✅ Saved: {}", path.display());
        Ok(path)
    }
}

/// Re-encode a decoded image in `format`; `path` only labels the error
fn encode_image(image: &DynamicImage, format: ImageFormat, path: &Path) -> ScrapeResult<Vec<u8>> {
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, format)
        .map_err(|source| ScrapeError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(encoded.into_inner())
}

/// Write to a hidden sibling, then rename it into place.
///
/// Only complete files ever carry the final name.
async fn write_atomically(path: &Path, contents: Vec<u8>) -> ScrapeResult<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = path.with_file_name(format!(".{file_name}{PARTIAL_SUFFIX}"));

    tokio::fs::write(&partial, contents)
        .await
        .map_err(|e| ScrapeError::filesystem(&partial, e))?;

    if let Err(e) = tokio::fs::rename(&partial, path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(ScrapeError::filesystem(path, e));
    }
    Ok(())
}

fn decode_error(url: &str, source: image::ImageError) -> ScrapeError {
    ScrapeError::Decode {
        url: url.to_string(),
        source,
    }
}

/// Canonical file extension for a detected format
pub fn format_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Look for `<dir>/<stem>.<ext>` under every extension the decoder knows
async fn find_existing(dir: &Path, stem: &str) -> ScrapeResult<Option<PathBuf>> {
    for format in ImageFormat::all() {
        for extension in format.extensions_str() {
            let candidate = dir.join(format!("{stem}.{extension}"));
            let exists = tokio::fs::try_exists(&candidate)
                .await
                .map_err(|e| ScrapeError::filesystem(&candidate, e))?;
            if exists {
                return Ok(Some(candidate));
            }
        }
    }
    Ok(None)
}
