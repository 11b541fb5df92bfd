//! Logging system configuration and initialization
//!
//! - Console output with local timestamps
//! - Optional daily-rolling file output (plain or JSON)
//! - `RUST_LOG` overrides the configured level and module filters

#![allow(clippy::uninlined_format_args)]

use std::path::Path;

use chrono::Local;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

pub use crate::infrastructure::config::LoggingConfig;

/// Prefix of the rolling log file
pub const LOG_FILE_PREFIX: &str = "wiki-gallery-scraper.log";

/// Local-time formatter for log lines
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Build the env filter: `RUST_LOG` wins, otherwise the configured level plus module caps
///
/// Module caps are skipped at `trace` so every dependency log is visible.
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new(&config.level);

        if !config.level.to_lowercase().contains("trace") {
            for (module, level) in &config.module_filters {
                match format!("{}={}", module, level).parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(e) => eprintln!("Ignoring invalid log filter {}={}: {}", module, level, e),
                }
            }
        }

        filter
    })
}

/// Initialize logging with custom configuration
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the process.
pub fn init_logging_with_config(config: &LoggingConfig) -> ScrapeResult<Option<WorkerGuard>> {
    let registry = Registry::default().with(build_env_filter(config));

    let guard = match (config.file_output, config.console_output) {
        (true, console) => {
            let (file_writer, guard) = file_writer(&config.log_dir)?;

            if config.json_format {
                let file_layer = fmt::Layer::new()
                    .json()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false);
                let console_layer = console.then(|| {
                    fmt::Layer::new()
                        .with_writer(std::io::stdout)
                        .with_timer(LocalTimeFormatter)
                        .with_target(false)
                });
                registry.with(file_layer).with(console_layer).init();
            } else {
                let file_layer = fmt::Layer::new()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(false)
                    .with_ansi(false);
                let console_layer = console.then(|| {
                    fmt::Layer::new()
                        .with_writer(std::io::stdout)
                        .with_timer(LocalTimeFormatter)
                        .with_target(false)
                });
                registry.with(file_layer).with(console_layer).init();
            }

            Some(guard)
        }
        (false, true) => {
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stdout)
                .with_timer(LocalTimeFormatter)
                .with_target(false);
            registry.with(console_layer).init();
            None
        }
        (false, false) => {
            return Err(ScrapeError::invalid_config("No logging output configured"));
        }
    };

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("Console output: {}", config.console_output);
    info!("File output: {}", config.file_output);
    if config.file_output {
        info!("Log directory: {:?}", config.log_dir);
    }

    Ok(guard)
}

fn file_writer(log_dir: &Path) -> ScrapeResult<(non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir).map_err(|e| ScrapeError::filesystem(log_dir, e))?;
    let appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    Ok(non_blocking(appender))
}

/// Log run environment for diagnostics
pub fn log_system_info() {
    info!("=== Wiki Gallery Scraper ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}
