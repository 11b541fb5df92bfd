//! Error types for gallery scraping
//!
//! Page-level failures are recovered as an empty gallery, image-level
//! failures are logged and counted; only configuration and catalog errors
//! stop a run before it starts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to fetch gallery page {url}: HTTP {status}")]
    PageFetch { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Image download failed with HTTP {status}: {url}")]
    Download { url: String, status: u16 },

    #[error("Response from {url} is not a decodable image: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image for {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read catalog {path:?}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid naming pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ScrapeError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether the batch keeps going after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PageFetch { .. }
            | Self::Transport { .. }
            | Self::Download { .. }
            | Self::Decode { .. }
            | Self::Encode { .. }
            | Self::Filesystem { .. }
            | Self::Pattern(_) => true,
            Self::Catalog { .. } | Self::Config(_) | Self::InvalidConfig { .. } => false,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
