pub mod sampler;
pub mod source;
pub mod synthetic;

pub use sampler::SamplerController;
pub use source::{GyroReading, MotionSource};
pub use synthetic::SyntheticMotion;
