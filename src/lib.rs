//! Sleep-session recording core: motion sampling while a session is active,
//! durable session history, and a streak-based token ledger with daily claim
//! rules.

pub mod config;
pub mod models;
pub mod motion;
pub mod recorder;
pub mod rewards;
pub mod store;

pub use config::RecorderConfig;
pub use models::{MovementSample, SleepSession, UserLedger};
pub use motion::{GyroReading, MotionSource, SyntheticMotion};
pub use recorder::{RecorderController, RecorderSnapshot, RecorderStatus, StopOutcome};
pub use store::Store;
