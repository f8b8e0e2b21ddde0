//! Generation flow: placeholder records, authenticated requests, results

pub mod client;
pub mod orchestrator;
pub mod record;

pub use client::GenerationClient;
pub use orchestrator::GenerationOrchestrator;
pub use record::{
    format_duration_label, parse_duration_label, RecordingId, RecordingRecord, RecordingStatus,
    RecordingStore, ERROR_DURATION_LABEL, PENDING_DURATION_LABEL,
};
