pub mod controller;
pub mod state;

pub use controller::{RecorderController, RecorderSnapshot, StopOutcome};
pub use state::{RecorderState, RecorderStatus};
