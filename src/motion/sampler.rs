use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::MovementSample;
use crate::recorder::{RecorderState, RecorderStatus};

use super::source::{GyroReading, MotionSource};

/// Owns the sampling task for the active recording. Stopping cancels the
/// task and joins it before returning, so no sample lands after the recorder
/// has left `Recording`.
pub struct SamplerController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub async fn start_sampling(
        &mut self,
        source: Arc<dyn MotionSource>,
        interval: Duration,
        state: Arc<Mutex<RecorderState>>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        // An unavailable sensor does not block the recording itself; the
        // session just ends up with an empty sample set.
        match source.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("motion sensor unavailable; recording without samples");
                return Ok(());
            }
            Err(err) => {
                warn!("motion sensor availability check failed: {err:#}");
                return Ok(());
            }
        }

        source.set_sample_interval(interval);
        let receiver = source.subscribe();

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let handle = tokio::spawn(sampling_loop(receiver, state, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop_sampling(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sampling task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SamplerController {
    fn default() -> Self {
        Self::new()
    }
}

async fn sampling_loop(
    mut receiver: mpsc::Receiver<GyroReading>,
    state: Arc<Mutex<RecorderState>>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!("sampling loop shutting down");
                break;
            }
            delivery = receiver.recv() => {
                match delivery {
                    Some(reading) => {
                        let mut guard = state.lock().await;
                        if guard.status != RecorderStatus::Recording {
                            break;
                        }
                        guard.push_sample(MovementSample {
                            timestamp: Utc::now().timestamp_millis(),
                            movement: reading.movement(),
                        });
                    }
                    None => {
                        warn!("motion source closed the reading stream");
                        break;
                    }
                }
            }
        }
    }
}
