//! Politeness throttling between image downloads
//!
//! The downloader calls [`Throttle::pause`] after every completed download
//! attempt, successful or not. Skipped images never pause.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use tokio::time::sleep;
use tracing::debug;

use crate::infrastructure::config::{ThrottleConfig, ThrottleStrategy};
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait before the next download may start
    async fn pause(&self);
}

/// Sleep a fixed duration after each attempt
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        debug!("Pausing {:?} before next download", self.delay);
        sleep(self.delay).await;
    }
}

/// Token bucket limiting attempts to a steady rate
pub struct TokenBucket {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl TokenBucket {
    pub fn per_second(requests_per_second: u32) -> ScrapeResult<Self> {
        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            ScrapeError::invalid_config("Rate limit must be greater than 0")
        })?;

        Ok(Self {
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }
}

#[async_trait]
impl Throttle for TokenBucket {
    async fn pause(&self) {
        self.limiter.until_ready().await;
    }
}

/// No pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn pause(&self) {}
}

/// Build the throttle selected in configuration
pub fn from_config(config: &ThrottleConfig) -> ScrapeResult<Arc<dyn Throttle>> {
    let throttle: Arc<dyn Throttle> = match config.strategy {
        ThrottleStrategy::Fixed => Arc::new(FixedDelay::new(config.delay())),
        ThrottleStrategy::TokenBucket => Arc::new(TokenBucket::per_second(config.requests_per_second)?),
        ThrottleStrategy::None => Arc::new(NoThrottle),
    };
    Ok(throttle)
}
