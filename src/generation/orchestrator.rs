//! Optimistic generation flow: placeholder, request, terminal update
//!
//! Every accepted `generate` call emits exactly two record updates on the
//! update channel: a Pending placeholder, synchronously, then one terminal
//! Ready or Failed record with the same id once the request settles.

use crate::audio::duration::measure;
use crate::error::MemovoxError;
use crate::generation::client::GenerationClient;
use crate::generation::record::{
    format_duration_label, RecordingId, RecordingRecord, RecordingStatus, ERROR_DURATION_LABEL,
};
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest slice of the request value echoed into a failure title
const ERROR_VALUE_PREVIEW_CHARS: usize = 24;

/// Sequences one generation flow at a time from placeholder to result
pub struct GenerationOrchestrator {
    client: Arc<GenerationClient>,
    update_tx: Sender<RecordingRecord>,
    update_rx: Receiver<RecordingRecord>,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<GenerationClient>) -> Self {
        let (update_tx, update_rx) = unbounded();
        Self {
            client,
            update_tx,
            update_rx,
        }
    }

    /// Receiver for record updates
    ///
    /// The UI polls this the way it polls any other event channel; updates
    /// for one id always arrive Pending first, terminal second.
    pub fn update_receiver(&self) -> Receiver<RecordingRecord> {
        self.update_rx.clone()
    }

    /// Kick off one generation flow without blocking the caller
    ///
    /// A blank topic or value (after trimming) is a deliberate no-op: no
    /// request is made and nothing is emitted. Returns the handle of the
    /// placeholder record when the flow was accepted.
    pub fn generate(&self, topic: &str, value: &str) -> Option<RecordingId> {
        let topic = topic.trim().to_string();
        let value = value.trim().to_string();
        if topic.is_empty() || value.is_empty() {
            debug!("generation skipped: blank topic or value");
            return None;
        }

        let id = RecordingId::new();
        let title = format!("{}: {}", topic, value);
        let pending = RecordingRecord::pending(id, &title);
        let date = pending.date;
        let _ = self.update_tx.send(pending);

        let client = self.client.clone();
        let update_tx = self.update_tx.clone();
        tokio::spawn(async move {
            let update = match client.generate(&topic, &value).await {
                Ok(bytes) => ready_record(id, &title, date, bytes),
                Err(e) => failed_record(id, &topic, &value, date, &e),
            };
            let _ = update_tx.send(update);
        });

        Some(id)
    }
}

/// Terminal record for arrived audio; duration measured from the bytes
fn ready_record(id: RecordingId, title: &str, date: DateTime<Utc>, bytes: Vec<u8>) -> RecordingRecord {
    let seconds = measure(&bytes);
    debug!(id = %id, seconds, "generation resolved");
    RecordingRecord {
        id,
        title: title.to_string(),
        date,
        duration_label: format_duration_label(seconds),
        audio: Some(bytes),
        status: RecordingStatus::Ready,
    }
}

/// Terminal record for a failed flow; the title carries topic, truncated
/// value, and the error text
fn failed_record(
    id: RecordingId,
    topic: &str,
    value: &str,
    date: DateTime<Utc>,
    error: &MemovoxError,
) -> RecordingRecord {
    warn!(id = %id, topic, "generation failed: {}", error);
    let mut preview: String = value.chars().take(ERROR_VALUE_PREVIEW_CHARS).collect();
    if value.chars().count() > ERROR_VALUE_PREVIEW_CHARS {
        preview.push_str("...");
    }
    RecordingRecord {
        id,
        title: format!("{} ({}): {}", topic, preview, error),
        date,
        duration_label: ERROR_DURATION_LABEL.to_string(),
        audio: None,
        status: RecordingStatus::Failed,
    }
}
