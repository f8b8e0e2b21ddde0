//! Audio decoding and output

pub mod duration;
pub mod sink;

pub use duration::{measure, probe_wav, FALLBACK_BYTES_PER_SEC};
pub use sink::AudioOutput;
