//! Playback over the recording list
//!
//! A state machine holding at most one active item. Progress is sampled by a
//! fixed-interval poll task; selecting a new item (or deselecting the current
//! one) aborts the poll and drops the audio resource unconditionally.

use crate::audio::duration::probe_wav;
use crate::audio::sink::AudioOutput;
use crate::generation::record::{parse_duration_label, RecordingId, RecordingRecord};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default progress poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Playback state machine phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing selected
    #[default]
    Idle,
    /// An item is selected and stopped at its current position
    Selected,
    /// Audio (or the time simulation) is advancing
    Playing,
    /// Paused mid-item
    Paused,
}

impl PlaybackPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackPhase::Idle)
    }
}

/// Snapshot of the playback session
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub active: Option<RecordingId>,
    pub phase: PlaybackPhase,
    pub position: Duration,
    pub total: Duration,
}

/// Wall-clock stopwatch tracking elapsed playback time across pauses
#[derive(Debug, Clone, Default)]
struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map(|s| s.elapsed()).unwrap_or(Duration::ZERO)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State shared with the poll task
#[derive(Default)]
struct PlaybackShared {
    session: PlaybackSession,
    clock: PlaybackClock,
    /// Active item has no audio bytes; position advances by pure time
    /// simulation instead of the clock
    simulated: bool,
}

/// Playback controller: one active item, poll-driven progress
pub struct PlaybackController {
    shared: Arc<RwLock<PlaybackShared>>,
    output: Option<AudioOutput>,
    clip: Option<Vec<u8>>,
    poll_task: Option<JoinHandle<()>>,
    poll_interval: Duration,
    volume: f32,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(RwLock::new(PlaybackShared::default())),
            output: None,
            clip: None,
            poll_task: None,
            poll_interval,
            volume: 0.8,
        }
    }

    /// Get a snapshot of the playback session
    pub fn session(&self) -> PlaybackSession {
        self.shared.read().session.clone()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Select a record, or deselect it when it is already active
    ///
    /// Any prior audio resource is torn down first. `total` comes from the
    /// record's duration label; when audio bytes are present they are probed
    /// eagerly and a successful decode overwrites `total`.
    pub fn select(&mut self, record: &RecordingRecord) {
        let was_active = self.shared.read().session.active == Some(record.id);
        self.teardown();
        if was_active {
            debug!(id = %record.id, "deselected");
            return;
        }

        let mut total = parse_duration_label(&record.duration_label).unwrap_or(Duration::ZERO);
        if let Some(bytes) = &record.audio {
            match probe_wav(bytes) {
                Some(seconds) => total = Duration::from_secs_f32(seconds),
                None => debug!(id = %record.id, "clip has no parseable header, keeping label duration"),
            }
        }

        self.clip = record.audio.clone();
        let mut shared = self.shared.write();
        shared.session = PlaybackSession {
            active: Some(record.id),
            phase: PlaybackPhase::Selected,
            position: Duration::ZERO,
            total,
        };
        shared.simulated = record.audio.is_none();
        debug!(id = %record.id, total_secs = total.as_secs_f32(), simulated = shared.simulated, "selected");
    }

    /// Start, resume, or pause playback of the selected item
    ///
    /// Starting spawns the progress poll; pausing stops it. Completion is
    /// detected on a poll tick, so leaving the Playing phase can lag the
    /// true end of the audio by up to one poll interval.
    pub fn toggle_playback(&mut self) {
        let phase = self.shared.read().session.phase;
        match phase {
            PlaybackPhase::Selected | PlaybackPhase::Paused => self.start_playing(),
            PlaybackPhase::Playing => self.pause_playing(),
            PlaybackPhase::Idle => warn!("toggle_playback ignored: nothing selected"),
        }
    }

    /// Set the output volume, clamped to 0.0..=1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(output) = &self.output {
            output.set_volume(self.volume);
        }
    }

    fn start_playing(&mut self) {
        if let Some(bytes) = &self.clip {
            let needs_output = self.output.as_ref().map_or(true, |o| o.is_finished());
            if needs_output {
                match AudioOutput::prepare(bytes.clone()) {
                    Ok(output) => {
                        output.set_volume(self.volume);
                        self.output = Some(output);
                    }
                    Err(e) => {
                        // No output device (or an undecodable clip): keep the
                        // clock-based progress running without sound
                        warn!("audio output unavailable, continuing silently: {}", e);
                        self.output = None;
                    }
                }
            }
            if let Some(output) = &self.output {
                output.play();
            }
        }

        {
            let mut shared = self.shared.write();
            shared.session.phase = PlaybackPhase::Playing;
            shared.clock.start();
        }
        self.spawn_poll();
    }

    fn pause_playing(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        if let Some(output) = &self.output {
            output.pause();
        }
        let mut shared = self.shared.write();
        shared.session.phase = PlaybackPhase::Paused;
        shared.clock.pause();
        debug!("paused");
    }

    /// Abort the poll, drop the audio resource, return the session to Idle
    fn teardown(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        self.output = None;
        self.clip = None;
        let mut shared = self.shared.write();
        shared.session = PlaybackSession::default();
        shared.clock.reset();
        shared.simulated = false;
    }

    /// Replace any live poll task with a fresh one
    fn spawn_poll(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        let shared = self.shared.clone();
        let interval = self.poll_interval;
        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !advance_tick(&shared, interval) {
                    break;
                }
            }
        }));
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

/// One poll tick: copy elapsed time into the session position and run the
/// completion check. Returns false when polling should stop.
fn advance_tick(shared: &Arc<RwLock<PlaybackShared>>, interval: Duration) -> bool {
    let mut guard = shared.write();
    if guard.session.phase != PlaybackPhase::Playing {
        return false;
    }

    if guard.simulated {
        guard.session.position += interval;
    } else {
        guard.session.position = guard.clock.elapsed();
    }

    if !guard.session.total.is_zero() && guard.session.position >= guard.session.total {
        guard.session.phase = PlaybackPhase::Selected;
        guard.session.position = Duration::ZERO;
        guard.clock.reset();
        debug!("playback complete");
        return false;
    }

    true
}
