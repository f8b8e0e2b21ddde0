//! Audio output through rodio

use crate::error::{MemovoxError, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;

/// One clip loaded onto the default output device
///
/// The stream handle must outlive the sink, so both live here together.
/// Dropping the handle stops playback and releases the device.
pub struct AudioOutput {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioOutput {
    /// Decode `bytes` and queue them on the default output device, paused
    pub fn prepare(bytes: Vec<u8>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MemovoxError::AudioDevice(e.to_string()))?;
        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| MemovoxError::DecodeFailure(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| MemovoxError::AudioDevice(e.to_string()))?;

        sink.append(source);
        sink.pause();

        Ok(Self {
            _stream: stream,
            sink,
        })
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    /// True once the queued clip has run out
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}
