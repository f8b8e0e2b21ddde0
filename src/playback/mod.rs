//! Playback state machine and progress poll

pub mod controller;

pub use controller::{PlaybackController, PlaybackPhase, PlaybackSession, DEFAULT_POLL_INTERVAL};
