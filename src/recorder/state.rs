use serde::{Deserialize, Serialize};

use crate::models::MovementSample;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecorderStatus {
    Idle,
    Recording,
}

impl Default for RecorderStatus {
    fn default() -> Self {
        RecorderStatus::Idle
    }
}

/// Transient tracking state. Never persisted; the store only ever sees
/// completed sessions.
#[derive(Debug, Clone, Default)]
pub struct RecorderState {
    pub status: RecorderStatus,
    /// Milliseconds since the Unix epoch, set on the Idle → Recording
    /// transition.
    pub started_at: Option<i64>,
    pub samples: Vec<MovementSample>,
}

impl RecorderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, started_at: i64) {
        *self = Self {
            status: RecorderStatus::Recording,
            started_at: Some(started_at),
            samples: Vec::new(),
        };
    }

    pub fn push_sample(&mut self, sample: MovementSample) {
        self.samples.push(sample);
    }

    pub fn total_movement(&self) -> f64 {
        self.samples.iter().map(|sample| sample.movement).sum()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
