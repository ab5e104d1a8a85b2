use serde::{Deserialize, Serialize};

/// One motion reading folded to a scalar, stamped with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementSample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub movement: f64,
}

/// A completed recording interval. Immutable once created; samples are
/// ordered by non-decreasing timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    pub movement_data: Vec<MovementSample>,
}

impl SleepSession {
    pub fn total_movement(&self) -> f64 {
        self.movement_data.iter().map(|sample| sample.movement).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_movement_sums_samples() {
        let session = SleepSession {
            start_time: 0,
            end_time: 3_000,
            duration: 3_000,
            movement_data: vec![
                MovementSample {
                    timestamp: 1_000,
                    movement: 0.5,
                },
                MovementSample {
                    timestamp: 2_000,
                    movement: 1.25,
                },
            ],
        };
        assert!((session.total_movement() - 1.75).abs() < f64::EPSILON);
    }

    #[test]
    fn session_serializes_with_camel_case_keys() {
        let session = SleepSession {
            start_time: 10,
            end_time: 20,
            duration: 10,
            movement_data: vec![MovementSample {
                timestamp: 15,
                movement: 0.1,
            }],
        };

        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert!(json.get("movementData").is_some());
        assert!(json["movementData"][0].get("timestamp").is_some());
    }
}
