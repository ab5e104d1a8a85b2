use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::source::{GyroReading, MotionSource};

/// Stand-in gyroscope that emits jittered readings at the configured
/// cadence. Amplitude 0 models a phone lying perfectly still.
pub struct SyntheticMotion {
    amplitude: f64,
    available: bool,
    interval_ms: AtomicU64,
}

impl SyntheticMotion {
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude,
            available: true,
            interval_ms: AtomicU64::new(1_000),
        }
    }

    /// A source that reports no usable sensor, for exercising the
    /// sensor-missing path.
    pub fn unavailable() -> Self {
        Self {
            amplitude: 0.0,
            available: false,
            interval_ms: AtomicU64::new(1_000),
        }
    }
}

#[async_trait]
impl MotionSource for SyntheticMotion {
    async fn is_available(&self) -> Result<bool> {
        Ok(self.available)
    }

    fn set_sample_interval(&self, interval: Duration) {
        self.interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    fn subscribe(&self) -> mpsc::Receiver<GyroReading> {
        let (tx, rx) = mpsc::channel(64);
        let interval =
            Duration::from_millis(self.interval_ms.load(Ordering::Relaxed).max(1));
        let amplitude = self.amplitude;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut rng = StdRng::from_entropy();

            loop {
                ticker.tick().await;
                let reading = if amplitude > 0.0 {
                    GyroReading {
                        x: rng.gen_range(-amplitude..=amplitude),
                        y: rng.gen_range(-amplitude..=amplitude),
                        z: rng.gen_range(-amplitude..=amplitude),
                    }
                } else {
                    GyroReading {
                        x: 0.0,
                        y: 0.0,
                        z: 0.0,
                    }
                };

                if tx.send(reading).await.is_err() {
                    break;
                }
            }
        });

        rx
    }
}
