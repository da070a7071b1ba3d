//! The player state machine.
//!
//! `Engine` is a plain struct driven by `handle_cmd` and `tick`; the
//! thread loop at the bottom of this file wraps it in the usual
//! command-channel shape. All session state mutations happen here, in
//! reaction to either a command or a resource event, never in UI code.
//!
//! Resolution events are matched against the generation token of the
//! attempt in flight, and playback events against the generation of the
//! bound source; everything else is a late arrival from a superseded
//! attempt and is dropped.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::{PlayerSettings, ResolverSettings};
use crate::resource::{PlaybackResource, ResourceEvent, RodioResource};
use crate::source::{Resolution, ResolutionStep, candidates_for};

use super::queue::position_of;
use super::types::{Notice, PlayerCmd, PlayerPhase, StateHandle};
use crate::track::TrackDescriptor;

/// Engine tick period; bounds how fast resolution deadlines and resource
/// events are noticed.
const TICK: Duration = Duration::from_millis(50);

pub(crate) struct Engine<R: PlaybackResource> {
    resource: R,
    shared: StateHandle,
    player_cfg: PlayerSettings,
    resolver_cfg: ResolverSettings,

    queue: Vec<TrackDescriptor>,
    current: Option<TrackDescriptor>,
    phase: PlayerPhase,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    loop_enabled: bool,

    /// The bound source has drained and was not restarted or advanced
    /// from; a resume must rewind instead of playing an empty sink.
    at_end: bool,

    /// Monotonic counter; each load attempt gets the next value.
    generation: u64,
    /// Generation of the source confirmed playable at start, 0 when none.
    bound_generation: u64,
    resolution: Option<Resolution>,
}

impl<R: PlaybackResource> Engine<R> {
    pub(crate) fn new(
        mut resource: R,
        shared: StateHandle,
        player_cfg: PlayerSettings,
        resolver_cfg: ResolverSettings,
    ) -> Self {
        let volume = player_cfg.volume.clamp(0.0, 1.0);
        resource.set_volume(volume);
        Self {
            resource,
            shared,
            loop_enabled: player_cfg.loop_enabled,
            player_cfg,
            resolver_cfg,
            queue: Vec::new(),
            current: None,
            phase: PlayerPhase::Idle,
            position: Duration::ZERO,
            duration: None,
            volume,
            at_end: false,
            generation: 0,
            bound_generation: 0,
            resolution: None,
        }
    }

    pub(crate) fn handle_cmd(&mut self, cmd: PlayerCmd, now: Instant) {
        match cmd {
            PlayerCmd::Play(track) => self.start_play(track, now),

            PlayerCmd::Pause => self.pause(),

            PlayerCmd::Resume => self.resume(),

            PlayerCmd::TogglePlayPause => {
                if self.phase == PlayerPhase::Playing {
                    self.pause();
                } else {
                    self.resume();
                }
            }

            PlayerCmd::Seek(position) => {
                if self.current.is_some() {
                    self.resource.seek(position);
                    self.position = self.resource.position();
                    self.at_end = false;
                }
            }

            PlayerCmd::SetVolume(volume) => {
                self.resource.set_volume(volume.clamp(0.0, 1.0));
                self.volume = self.resource.volume();
            }

            PlayerCmd::ToggleLoop => {
                self.loop_enabled = !self.loop_enabled;
                self.apply_effective_loop();
            }

            PlayerCmd::Next => self.advance(now, false),

            PlayerCmd::Prev => {
                let Some(current) = self.current.clone() else {
                    return;
                };
                if let Some(pos) = position_of(&self.queue, &current) {
                    // No-op at the queue head.
                    if pos > 0 {
                        let prev = self.queue[pos - 1].clone();
                        self.start_play(prev, now);
                    }
                }
            }

            PlayerCmd::AddToQueue(tracks) => {
                self.queue.extend(tracks);
                self.publish_queue();
            }

            PlayerCmd::ClearQueue => {
                // Does not affect the current track or playback.
                self.queue.clear();
                self.publish_queue();
            }

            // Handled by the thread loop.
            PlayerCmd::Quit => {}
        }
        self.publish();
    }

    pub(crate) fn tick(&mut self, now: Instant) {
        for event in self.resource.poll() {
            self.handle_event(event, now);
        }
        self.step_resolution(now);

        if self.phase == PlayerPhase::Playing {
            self.position = self.resource.position();
            if self.duration.is_none() {
                self.duration = self.resource.duration();
            }
        }
        self.publish();
    }

    pub(crate) fn shutdown(&mut self) {
        self.resource.stop();
        self.phase = PlayerPhase::Idle;
        self.publish();
    }

    fn start_play(&mut self, track: TrackDescriptor, now: Instant) {
        let candidates = candidates_for(&track, &self.resolver_cfg.api_base);
        if candidates.is_empty() {
            // Refused before touching the playback resource; playback
            // state is left exactly as it was.
            info!(title = %track.display(), "track has no playable source");
            self.push_notice(Notice::NoPlayableSource {
                title: track.display(),
            });
            return;
        }

        debug!(
            title = %track.display(),
            candidates = candidates.len(),
            "starting source resolution"
        );

        // Superseding an in-flight attempt: the next begin_load resets
        // the resource, and stale events die on the generation check.
        self.current = Some(track.clone());
        self.phase = PlayerPhase::Loading;
        self.position = Duration::ZERO;
        self.duration = None;
        self.at_end = false;
        self.bound_generation = 0;
        self.resolution = Some(Resolution::new(
            track,
            candidates,
            Duration::from_millis(self.resolver_cfg.attempt_timeout_ms),
            Duration::from_millis(self.resolver_cfg.settle_ms),
        ));
        self.step_resolution(now);
    }

    fn pause(&mut self) {
        // Valid only with a current track; otherwise a no-op.
        if self.current.is_none() {
            return;
        }
        self.resource.pause();
        if self.phase == PlayerPhase::Playing {
            self.phase = PlayerPhase::Paused;
        }
    }

    fn resume(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.at_end {
            // The sink drained; resuming means starting over.
            self.resource.seek(Duration::ZERO);
            self.position = Duration::ZERO;
            self.at_end = false;
        }
        self.resource.play();
        if self.phase == PlayerPhase::Paused {
            self.phase = PlayerPhase::Playing;
        }
    }

    fn handle_event(&mut self, event: ResourceEvent, now: Instant) {
        let generation = event.generation();

        if self
            .resolution
            .as_ref()
            .is_some_and(|r| r.generation() == generation)
        {
            self.handle_resolution_event(event, now);
        } else if self.bound_generation != 0 && generation == self.bound_generation {
            self.handle_playback_event(event, now);
        } else {
            debug!(generation, "dropping event from superseded attempt");
        }
    }

    /// Events for the attempt the resolver currently has in flight.
    fn handle_resolution_event(&mut self, event: ResourceEvent, now: Instant) {
        match event {
            ResourceEvent::MetadataLoaded { duration, .. } => {
                self.duration = duration;
                self.apply_effective_loop();
            }
            ResourceEvent::CanPlay { generation } => {
                // This is the bound source; resolution is done.
                self.resource.play();
                self.bound_generation = generation;
                self.phase = PlayerPhase::Playing;
                if let Some(r) = self.resolution.take() {
                    info!(
                        title = %r.track().display(),
                        source = %r.current(),
                        attempts = r.attempts_made(),
                        "source bound"
                    );
                }
                self.apply_effective_loop();
            }
            ResourceEvent::Error { message, .. } => {
                let exhausted = match self.resolution.as_mut() {
                    Some(r) => {
                        warn!(source = %r.current(), %message, "source attempt failed");
                        r.fail(now)
                    }
                    None => false,
                };
                if exhausted {
                    self.fail_resolution();
                }
            }
            // No position or end signals are expected before can-play.
            ResourceEvent::TimeUpdate { .. } | ResourceEvent::Ended { .. } => {}
        }
    }

    /// Events for the confirmed, bound source.
    fn handle_playback_event(&mut self, event: ResourceEvent, now: Instant) {
        match event {
            ResourceEvent::TimeUpdate { position, .. } => {
                self.position = position;
            }
            ResourceEvent::MetadataLoaded { duration, .. } => {
                self.duration = duration;
                self.apply_effective_loop();
            }
            ResourceEvent::Ended { .. } => self.on_ended(now),
            ResourceEvent::Error { message, .. } => {
                // The source was confirmed playable at start and degraded
                // mid-stream: reported, never retried.
                warn!(%message, "playback error on bound source");
                self.phase = PlayerPhase::Paused;
                self.push_notice(Notice::PlaybackError { message });
            }
            ResourceEvent::CanPlay { .. } => {}
        }
    }

    fn on_ended(&mut self, now: Instant) {
        if self.effective_looping() {
            // Tight loop for preview-length clips: rewind and resume on
            // the same bound source, no re-resolution.
            self.resource.seek(Duration::ZERO);
            self.resource.play();
            self.position = Duration::ZERO;
            self.phase = PlayerPhase::Playing;
        } else {
            self.advance(now, true);
        }
    }

    /// Move to the successor of the current track in the queue.
    ///
    /// `after_end` marks auto-advance triggered by the current track
    /// finishing: when the track is absent from the queue the skip is
    /// still a no-op, but the drained playback must read as stopped.
    fn advance(&mut self, now: Instant, after_end: bool) {
        let Some(current) = self.current.clone() else {
            return;
        };
        match position_of(&self.queue, &current) {
            None => {
                if after_end {
                    self.phase = PlayerPhase::Paused;
                    self.at_end = true;
                }
            }
            Some(pos) => match self.queue.get(pos + 1).cloned() {
                Some(next) => self.start_play(next, now),
                None => {
                    // Queue exhausted: terminal, not an error.
                    debug!("queue exhausted");
                    self.resource.stop();
                    self.resolution = None;
                    self.bound_generation = 0;
                    self.current = None;
                    self.phase = PlayerPhase::Idle;
                    self.position = Duration::ZERO;
                    self.duration = None;
                    self.at_end = false;
                }
            },
        }
    }

    fn step_resolution(&mut self, now: Instant) {
        let step = match self.resolution.as_mut() {
            Some(r) => r.step(now),
            None => return,
        };
        match step {
            ResolutionStep::Wait => {}
            ResolutionStep::Begin => {
                self.generation += 1;
                let generation = self.generation;
                if let Some(r) = self.resolution.as_mut() {
                    // Each attempt fully resets the resource, so stale
                    // signals cannot cross between candidates.
                    self.resource.begin_load(r.current(), generation);
                    r.started(generation, now);
                }
            }
            ResolutionStep::Exhausted => self.fail_resolution(),
        }
    }

    /// All candidates failed: terminal for this play attempt, recoverable
    /// for the player. The attempted track stays current so front ends
    /// keep their context.
    fn fail_resolution(&mut self) {
        let Some(resolution) = self.resolution.take() else {
            return;
        };
        let title = resolution.track().display();
        error!(title = %title, attempts = resolution.attempts_made(), "all sources failed");
        self.resource.stop();
        self.phase = PlayerPhase::Idle;
        self.position = Duration::ZERO;
        self.duration = None;
        self.push_notice(Notice::AllSourcesFailed { title });
    }

    fn effective_looping(&self) -> bool {
        self.loop_enabled
            && self
                .duration
                .is_some_and(|d| d.as_secs_f64() <= self.player_cfg.preview_loop_max_secs)
    }

    fn apply_effective_loop(&mut self) {
        let effective = self.effective_looping();
        self.resource.set_looping(effective);
    }

    fn push_notice(&self, notice: Notice) {
        if let Ok(mut s) = self.shared.lock() {
            s.push_notice(notice);
        }
    }

    fn publish(&self) {
        if let Ok(mut s) = self.shared.lock() {
            s.current_track = self.current.clone();
            s.phase = self.phase;
            s.position = self.position;
            s.duration = self.duration;
            s.volume = self.volume;
            s.loop_enabled = self.loop_enabled;
        }
    }

    fn publish_queue(&self) {
        if let Ok(mut s) = self.shared.lock() {
            s.queue = self.queue.clone();
        }
    }
}

#[cfg(test)]
impl<R: PlaybackResource> Engine<R> {
    pub(super) fn resource(&self) -> &R {
        &self.resource
    }

    pub(super) fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

/// Command loop around the engine; mirrors the facade's channel end.
pub(crate) fn run_loop<R: PlaybackResource>(engine: &mut Engine<R>, rx: &Receiver<PlayerCmd>) {
    loop {
        match rx.recv_timeout(TICK) {
            Ok(PlayerCmd::Quit) => {
                engine.shutdown();
                break;
            }
            Ok(cmd) => {
                engine.handle_cmd(cmd, Instant::now());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                engine.shutdown();
                break;
            }
        }
        engine.tick(Instant::now());
    }
}

/// Spawn the player thread. The audio output must be opened on the
/// thread that owns it, so the resource is constructed inside.
pub(super) fn spawn_player_thread(
    player_cfg: PlayerSettings,
    resolver_cfg: ResolverSettings,
    rx: Receiver<PlayerCmd>,
    shared: StateHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let resource = match RodioResource::new(&resolver_cfg) {
            Ok(r) => r,
            Err(e) => {
                error!("failed to open audio output: {e}");
                if let Ok(mut s) = shared.lock() {
                    s.push_notice(Notice::PlaybackError {
                        message: e.to_string(),
                    });
                }
                return;
            }
        };
        let mut engine = Engine::new(resource, shared, player_cfg, resolver_cfg);
        run_loop(&mut engine, &rx);
    })
}
