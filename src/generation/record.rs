//! Recording records and the list store the UI renders

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use tracing::warn;

/// Label shown while generation is in flight
pub const PENDING_DURATION_LABEL: &str = "--:--";
/// Label shown when generation failed
pub const ERROR_DURATION_LABEL: &str = "Error";

/// Stable handle matching later updates to the same logical recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingId(Uuid);

impl RecordingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a recording record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingStatus {
    /// Placeholder emitted at request start
    Pending,
    /// Audio bytes arrived
    Ready,
    /// Generation failed; the title carries the error summary
    Failed,
}

impl RecordingStatus {
    /// Ready and Failed are terminal; they never retransition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordingStatus::Pending)
    }
}

/// One generated (or in-flight, or failed) voice memo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingRecord {
    pub id: RecordingId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration_label: String,
    pub audio: Option<Vec<u8>>,
    pub status: RecordingStatus,
}

impl RecordingRecord {
    /// Placeholder record created synchronously at request start
    pub fn pending(id: RecordingId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            date: Utc::now(),
            duration_label: PENDING_DURATION_LABEL.to_string(),
            audio: None,
            status: RecordingStatus::Pending,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().is_some_and(|bytes| !bytes.is_empty())
    }
}

/// Format a duration in seconds as MM:SS
pub fn format_duration_label(seconds: f32) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Parse a `minutes:seconds` label
///
/// Placeholders ("--:--", "Error") parse as `None`.
pub fn parse_duration_label(label: &str) -> Option<Duration> {
    let (mins, secs) = label.split_once(':')?;
    let mins: u64 = mins.trim().parse().ok()?;
    let secs: u64 = secs.trim().parse().ok()?;
    Some(Duration::from_secs(mins * 60 + secs))
}

/// Ordered, thread-safe recording list (pending items included)
///
/// Applies orchestrator updates in place so a record keeps its list position
/// across the pending-to-terminal transition.
#[derive(Clone, Default)]
pub struct RecordingStore {
    records: Arc<RwLock<Vec<RecordingRecord>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an orchestrator update
    ///
    /// A Pending record inserts at the end of the list; a terminal record
    /// replaces the Pending record with the same id. Anything else (terminal
    /// retransition, duplicate pending, terminal update for an unknown id)
    /// is rejected. Returns whether the update was applied.
    pub fn apply(&self, record: RecordingRecord) -> bool {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                if existing.status.is_terminal() || !record.status.is_terminal() {
                    warn!(id = %record.id, "rejected illegal record transition");
                    return false;
                }
                *existing = record;
                true
            }
            None => {
                if record.status.is_terminal() {
                    warn!(id = %record.id, "rejected terminal update for unknown record");
                    return false;
                }
                records.push(record);
                true
            }
        }
    }

    pub fn get(&self, id: RecordingId) -> Option<RecordingRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn get_all(&self) -> Vec<RecordingRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}
