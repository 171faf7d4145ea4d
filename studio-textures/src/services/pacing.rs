//! Inter-descriptor pacing
//!
//! Spaces out descriptor processing so a style with several materials does not
//! burst the AI and image services. Tests inject `NoPacing`.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default delay between descriptors
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(1000);

/// Called once before each descriptor is processed
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn pace(&self);
}

/// Minimum interval between consecutive `pace()` returns
///
/// The first call never waits.
pub struct IntervalPacing {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl IntervalPacing {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    pub fn from_millis(min_interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_interval_ms))
    }
}

impl Default for IntervalPacing {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_INTERVAL)
    }
}

#[async_trait]
impl PacingPolicy for IntervalPacing {
    async fn pace(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Pacing: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Zero-delay policy
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

#[async_trait]
impl PacingPolicy for NoPacing {
    async fn pace(&self) {}
}
