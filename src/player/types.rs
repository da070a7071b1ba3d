//! Player-facing small types: commands, phases, notices and the shared
//! session state handle.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::track::TrackDescriptor;

/// Where the player is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerPhase {
    /// No bound source. The last attempted track may still be current
    /// after a resolution failure, so front ends keep their context.
    #[default]
    Idle,
    /// Source resolution in progress for the current track.
    Loading,
    Playing,
    Paused,
}

/// Commands accepted by the player thread.
#[derive(Debug)]
pub enum PlayerCmd {
    /// Resolve and play the given track, superseding anything in flight.
    Play(TrackDescriptor),
    Pause,
    Resume,
    /// Dispatch to pause or resume based on whether playback is active.
    TogglePlayPause,
    /// Move the playback position (clamped to the source's bounds).
    Seek(Duration),
    /// Set the output volume (clamped to `[0, 1]`).
    SetVolume(f32),
    /// Flip the loop toggle. Effective looping additionally requires a
    /// preview-length reported duration.
    ToggleLoop,
    /// Skip to the track after the current one in the queue.
    Next,
    /// Go back to the track before the current one in the queue.
    Prev,
    /// Append tracks to the queue, preserving order.
    AddToQueue(Vec<TrackDescriptor>),
    /// Empty the queue without touching playback.
    ClearQueue,
    /// Stop playback and shut the player thread down.
    Quit,
}

/// Toast-style user-visible notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The track has no usable source candidate at all.
    NoPlayableSource { title: String },
    /// Every candidate was attempted and failed.
    AllSourcesFailed { title: String },
    /// The bound source failed during active playback.
    PlaybackError { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoPlayableSource { title } => {
                write!(f, "No preview available: {title} has no playable source")
            }
            Notice::AllSourcesFailed { title } => {
                write!(f, "Unable to play {title}. Please try another one.")
            }
            Notice::PlaybackError { message } => write!(f, "Playback error: {message}"),
        }
    }
}

/// Session state published by the engine and read by front ends.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The track bound to the playback resource; `None` means idle.
    pub current_track: Option<TrackDescriptor>,
    pub phase: PlayerPhase,
    pub position: Duration,
    /// Authoritative only once metadata has loaded.
    pub duration: Option<Duration>,
    pub volume: f32,
    pub loop_enabled: bool,
    pub queue: Vec<TrackDescriptor>,
    notices: Vec<Notice>,
}

impl SessionState {
    pub(crate) fn new(volume: f32, loop_enabled: bool) -> Self {
        Self {
            current_track: None,
            phase: PlayerPhase::default(),
            position: Duration::ZERO,
            duration: None,
            volume,
            loop_enabled,
            queue: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Whether the playback resource is actively advancing position.
    pub fn is_playing(&self) -> bool {
        self.phase == PlayerPhase::Playing
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain accumulated notifications. Front ends call this each time
    /// they refresh.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

pub type StateHandle = Arc<Mutex<SessionState>>;
