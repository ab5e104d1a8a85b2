use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One gyroscope reading in device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GyroReading {
    /// Scalar movement for a reading: |x| + |y| + |z|.
    pub fn movement(&self) -> f64 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

/// A source of gyroscope readings. The source owns the sampling cadence;
/// dropping the receiver returned by [`subscribe`](MotionSource::subscribe)
/// ends the subscription and the source must stop delivering.
#[async_trait]
pub trait MotionSource: Send + Sync {
    /// Whether the underlying sensor can deliver readings right now.
    async fn is_available(&self) -> Result<bool>;

    /// Requested delivery cadence. Applies to subscriptions created
    /// afterwards.
    fn set_sample_interval(&self, interval: Duration);

    /// Start delivering readings.
    fn subscribe(&self) -> mpsc::Receiver<GyroReading>;
}
