// Audio module - Real-time output through cpal

pub mod dsp_utils;
pub mod engine;
pub mod parameters;

pub use engine::{AudioEngine, AudioError};
pub use parameters::AtomicF32;
