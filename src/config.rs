use std::time::Duration;

/// Tunable thresholds for the session recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Cadence requested from the motion source.
    pub sample_interval_ms: u64,

    /// Sessions shorter than this are never flagged, whatever their movement.
    pub low_motion_min_duration_ms: i64,

    /// Total-movement ceiling under which a long session counts as motionless.
    pub low_motion_threshold: f64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1_000,
            low_motion_min_duration_ms: 15_000,
            low_motion_threshold: 1.0,
        }
    }
}

impl RecorderConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Low-motion check: long enough to matter, with next to no movement.
    /// Flagged sessions are surfaced to the caller for manual review.
    pub fn is_low_motion(&self, duration_ms: i64, total_movement: f64) -> bool {
        duration_ms > self.low_motion_min_duration_ms && total_movement < self.low_motion_threshold
    }
}
