//! Duration measurement for generated audio payloads

use std::io::Cursor;
use tracing::debug;

/// Byte rate assumed by the estimation fallback: 16 kHz, 16-bit, mono PCM.
/// The server contract declares no sample format, so this stays an assumption
/// used only when the payload has no parseable header.
pub const FALLBACK_BYTES_PER_SEC: u32 = 32_000;

/// Probe a WAV header and compute the clip duration in seconds
pub fn probe_wav(bytes: &[u8]) -> Option<f32> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    Some(reader.duration() as f32 / spec.sample_rate as f32)
}

/// Measured duration in seconds
///
/// Header probe first; byte-count estimation at [`FALLBACK_BYTES_PER_SEC`]
/// when the payload has no parseable header.
pub fn measure(bytes: &[u8]) -> f32 {
    match probe_wav(bytes) {
        Some(seconds) => seconds,
        None => {
            debug!(len = bytes.len(), "no parseable audio header, estimating duration");
            bytes.len() as f32 / FALLBACK_BYTES_PER_SEC as f32
        }
    }
}
