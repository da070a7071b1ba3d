//! The `rodio`-backed playback resource.
//!
//! Loading is handed to a short-lived loader thread: remote sources are
//! fetched over HTTP (bounded by the configured fetch timeout), local
//! sources are read from disk, and the bytes are probed with a throwaway
//! decoder for their duration. `poll` installs the winning load as a
//! paused sink on the caller's thread and emits `MetadataLoaded` +
//! `CanPlay`. Outcomes from superseded generations are discarded before
//! they can touch the sink.
//!
//! Seeking rebuilds the sink from the retained bytes with
//! `skip_duration`, and end-of-source is detected by the sink draining
//! while playback is active.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::config::ResolverSettings;
use crate::error::{Error, Result};
use crate::source::SourceLocation;

use super::types::{PlaybackResource, ResourceEvent};

enum LoadOutcome {
    Ready {
        generation: u64,
        bytes: Arc<[u8]>,
        duration: Option<Duration>,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

pub struct RodioResource {
    stream: OutputStream,
    client: reqwest::blocking::Client,
    loads_tx: Sender<LoadOutcome>,
    loads_rx: Receiver<LoadOutcome>,

    /// Generation of the load in flight; zero when no load is live (the
    /// engine never issues generation zero).
    generation: u64,
    sink: Option<Sink>,
    /// Retained source bytes for seek rebuilds.
    bytes: Option<Arc<[u8]>>,
    duration: Option<Duration>,

    paused: bool,
    ended: bool,

    // Position accounting: time played before the last resume, plus the
    // wall clock since it.
    base: Duration,
    started_at: Option<Instant>,

    volume: f32,
    looping: bool,
}

impl RodioResource {
    /// Open the default audio output. Must be called on the thread that
    /// will own the resource.
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::AudioOutput(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy next to our own shutdown logging.
        stream.log_on_drop(false);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(settings.fetch_timeout_ms))
            .build()
            .map_err(|e| Error::AudioOutput(e.to_string()))?;

        let (loads_tx, loads_rx) = mpsc::channel();

        Ok(Self {
            stream,
            client,
            loads_tx,
            loads_rx,
            generation: 0,
            sink: None,
            bytes: None,
            duration: None,
            paused: true,
            ended: false,
            base: Duration::ZERO,
            started_at: None,
            volume: 1.0,
            looping: false,
        })
    }

    fn clear_binding(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        // Invalidate any loader thread still running: its outcome must
        // not rebind the resource after a stop.
        self.generation = 0;
        self.bytes = None;
        self.duration = None;
        self.paused = true;
        self.ended = false;
        self.base = Duration::ZERO;
        self.started_at = None;
    }

    /// Build a paused sink over the retained bytes, skipped to `start`.
    fn install_sink(&mut self, start: Duration) -> std::result::Result<(), String> {
        let Some(bytes) = self.bytes.clone() else {
            return Err("no source bound".to_string());
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| e.to_string())?
            // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
            .skip_duration(start);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(decoder);
        sink.set_volume(self.volume);
        sink.pause();

        self.sink = Some(sink);
        self.paused = true;
        self.base = start;
        self.started_at = None;
        self.ended = false;
        Ok(())
    }
}

impl PlaybackResource for RodioResource {
    fn begin_load(&mut self, source: &SourceLocation, generation: u64) {
        self.clear_binding();
        self.generation = generation;

        debug!(%source, generation, "loading source");

        let source = source.clone();
        let client = self.client.clone();
        let tx = self.loads_tx.clone();
        thread::spawn(move || {
            let outcome = match fetch_bytes(&client, &source) {
                Ok(bytes) => {
                    let bytes: Arc<[u8]> = bytes.into();
                    // Probe with a throwaway decoder: confirms the bytes
                    // decode at all and yields the reported duration.
                    match Decoder::new(Cursor::new(bytes.clone())) {
                        Ok(probe) => LoadOutcome::Ready {
                            generation,
                            duration: probe.total_duration(),
                            bytes,
                        },
                        Err(e) => LoadOutcome::Failed {
                            generation,
                            message: format!("decode failed: {e}"),
                        },
                    }
                }
                Err(message) => LoadOutcome::Failed {
                    generation,
                    message,
                },
            };
            // The receiver only disappears on shutdown.
            let _ = tx.send(outcome);
        });
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            if self.paused {
                self.started_at = Some(Instant::now());
                self.paused = false;
            }
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if !self.paused {
            if let Some(st) = self.started_at.take() {
                self.base += st.elapsed();
            }
            self.paused = true;
        }
    }

    fn stop(&mut self) {
        self.clear_binding();
    }

    fn position(&self) -> Duration {
        let raw = self.base + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(d) => raw.min(d),
            None => raw,
        }
    }

    fn seek(&mut self, position: Duration) {
        if self.bytes.is_none() {
            return;
        }
        let target = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
        let resume = !self.paused;
        // Scrubbing rebuilds the sink and skips into the source.
        if let Err(e) = self.install_sink(target) {
            self.generation_error(e);
            return;
        }
        if resume {
            self.play();
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn poll(&mut self) -> Vec<ResourceEvent> {
        let mut events = Vec::new();

        while let Ok(outcome) = self.loads_rx.try_recv() {
            match outcome {
                LoadOutcome::Ready {
                    generation,
                    bytes,
                    duration,
                } => {
                    if !load_is_live(self.generation, generation) || self.bytes.is_some() {
                        debug!(generation, "dropping superseded load");
                        continue;
                    }
                    self.bytes = Some(bytes);
                    self.duration = duration;
                    match self.install_sink(Duration::ZERO) {
                        Ok(()) => {
                            events.push(ResourceEvent::MetadataLoaded {
                                generation,
                                duration,
                            });
                            events.push(ResourceEvent::CanPlay { generation });
                        }
                        Err(message) => {
                            self.clear_binding();
                            events.push(ResourceEvent::Error {
                                generation,
                                message,
                            });
                        }
                    }
                }
                LoadOutcome::Failed {
                    generation,
                    message,
                } => {
                    if !load_is_live(self.generation, generation) {
                        continue;
                    }
                    events.push(ResourceEvent::Error {
                        generation,
                        message,
                    });
                }
            }
        }

        if self.sink.is_some() && !self.paused && !self.ended {
            let drained = self.sink.as_ref().is_some_and(|s| s.empty());
            if drained && self.looping && self.bytes.is_some() {
                // Native loop restart: no Ended event, like the audio
                // element's loop flag.
                if self.install_sink(Duration::ZERO).is_ok() {
                    self.play();
                }
            } else if drained {
                self.ended = true;
                if let Some(d) = self.duration {
                    self.base = d;
                }
                self.started_at = None;
                events.push(ResourceEvent::Ended {
                    generation: self.generation,
                });
            } else {
                events.push(ResourceEvent::TimeUpdate {
                    generation: self.generation,
                    position: self.position(),
                });
            }
        }

        events
    }
}

impl RodioResource {
    /// Queue an error against the current generation from inside the
    /// resource itself (e.g. a failed sink rebuild on seek).
    fn generation_error(&mut self, message: String) {
        let _ = self.loads_tx.send(LoadOutcome::Failed {
            generation: self.generation,
            message,
        });
    }
}

/// A load outcome may only bind while its generation is the one in
/// flight. Zero marks "no live load" (set by `clear_binding`), so
/// anything a stopped or superseded loader thread delivers is dropped.
fn load_is_live(current: u64, generation: u64) -> bool {
    current != 0 && generation == current
}

fn fetch_bytes(
    client: &reqwest::blocking::Client,
    source: &SourceLocation,
) -> std::result::Result<Vec<u8>, String> {
    match source {
        SourceLocation::Remote(url) => {
            let response = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| format!("fetch failed: {e}"))?;
            let bytes = response
                .bytes()
                .map_err(|e| format!("fetch failed: {e}"))?;
            Ok(bytes.to_vec())
        }
        SourceLocation::Local(path) => {
            std::fs::read(path).map_err(|e| format!("read failed: {e}"))
        }
    }
}
