//! The `PlaybackResource` trait and its event signals.

use std::time::Duration;

use crate::source::SourceLocation;

/// Lifecycle signals emitted by a playback resource.
///
/// Every event carries the generation token of the load that produced
/// it, so the engine can discard anything from a superseded attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Position advanced while playing.
    TimeUpdate {
        generation: u64,
        position: Duration,
    },
    /// The source's metadata is known; `duration` is authoritative from
    /// here on (it can still be `None` for formats that do not report
    /// a length).
    MetadataLoaded {
        generation: u64,
        duration: Option<Duration>,
    },
    /// The source is loaded and a `play` call will start it.
    CanPlay { generation: u64 },
    /// Playback reached the end of the source.
    Ended { generation: u64 },
    /// The source failed to load, or failed during playback.
    Error { generation: u64, message: String },
}

impl ResourceEvent {
    /// The generation token of the load this event belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            ResourceEvent::TimeUpdate { generation, .. }
            | ResourceEvent::MetadataLoaded { generation, .. }
            | ResourceEvent::CanPlay { generation }
            | ResourceEvent::Ended { generation }
            | ResourceEvent::Error { generation, .. } => *generation,
        }
    }
}

/// One audio output unit, bound to at most one source at a time.
///
/// `begin_load` is asynchronous: it resets the resource, starts loading
/// in the background and reports the outcome through `poll` as
/// `MetadataLoaded` + `CanPlay` or `Error`, stamped with `generation`.
pub trait PlaybackResource {
    /// Reset the resource (stop, rewind, clear source) and start loading
    /// `source` under `generation`.
    fn begin_load(&mut self, source: &SourceLocation, generation: u64);

    /// Start or resume playback of the loaded source. No-op when nothing
    /// is loaded; failures surface as `Error` events.
    fn play(&mut self);

    /// Pause playback, keeping the source bound.
    fn pause(&mut self);

    /// Stop playback: pause, rewind and clear the bound source.
    fn stop(&mut self);

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Move the playback position, clamped to the source's bounds.
    fn seek(&mut self, position: Duration);

    /// Reported duration; `None` until metadata has loaded.
    fn duration(&self) -> Option<Duration>;

    fn volume(&self) -> f32;

    /// Set the output volume, clamped to `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    /// Loop flag. A resource may restart natively at end-of-source and
    /// suppress `Ended` while this is set; the engine also restarts off
    /// `Ended` for resources that cannot.
    fn set_looping(&mut self, looping: bool);

    /// Drain pending events.
    fn poll(&mut self) -> Vec<ResourceEvent>;
}
