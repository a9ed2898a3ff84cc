//! Inter-message pacing policies.
//!
//! Pacing is injected into the dispatcher as a policy object so alternate
//! strategies can be substituted without touching dispatch logic. The
//! interval is a pacing mechanism only; it carries no flow-control signal
//! from the bus.

use std::time::Duration;

use async_trait::async_trait;

/// Pause applied after every sent message, including the last of a batch.
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn pause(&self);
}

/// Fixed inter-message interval.
#[derive(Debug, Copy, Clone)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl PacingPolicy for FixedInterval {
    async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// No pacing: messages go out back to back.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoPacing;

#[async_trait]
impl PacingPolicy for NoPacing {
    async fn pause(&self) {}
}
