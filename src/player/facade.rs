//! The `Player` facade handed to front ends.
//!
//! Constructed once at application root and passed down explicitly; it
//! owns the engine thread and exposes the command surface plus the
//! shared session state handle.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::track::TrackDescriptor;

use super::engine::spawn_player_thread;
use super::types::{Notice, PlayerCmd, SessionState, StateHandle};

pub struct Player {
    tx: Sender<PlayerCmd>,
    shared: StateHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the player thread with the given settings.
    pub fn new(settings: &Settings) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let shared: StateHandle = Arc::new(Mutex::new(SessionState::new(
            settings.player.volume.clamp(0.0, 1.0),
            settings.player.loop_enabled,
        )));

        let join = spawn_player_thread(
            settings.player.clone(),
            settings.resolver.clone(),
            rx,
            shared.clone(),
        );

        Self {
            tx,
            shared,
            join: Mutex::new(Some(join)),
        }
    }

    /// The shared session state read by front ends.
    pub fn state_handle(&self) -> StateHandle {
        self.shared.clone()
    }

    /// A point-in-time copy of the session state.
    pub fn snapshot(&self) -> SessionState {
        self.shared
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|_| SessionState::new(1.0, false))
    }

    /// Drain pending user-visible notifications.
    pub fn take_notices(&self) -> Vec<Notice> {
        self.shared
            .lock()
            .map(|mut s| s.take_notices())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<()> {
        self.tx.send(cmd).map_err(|_| Error::ChannelClosed)
    }

    /// A clone of the command sender, for bridges like MPRIS.
    pub fn command_sender(&self) -> Sender<PlayerCmd> {
        self.tx.clone()
    }

    pub fn play(&self, track: TrackDescriptor) -> Result<()> {
        self.send(PlayerCmd::Play(track))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlayerCmd::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(PlayerCmd::Resume)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(PlayerCmd::TogglePlayPause)
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send(PlayerCmd::Seek(position))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(PlayerCmd::SetVolume(volume))
    }

    pub fn toggle_loop(&self) -> Result<()> {
        self.send(PlayerCmd::ToggleLoop)
    }

    pub fn next(&self) -> Result<()> {
        self.send(PlayerCmd::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(PlayerCmd::Prev)
    }

    pub fn add_to_queue(&self, tracks: Vec<TrackDescriptor>) -> Result<()> {
        self.send(PlayerCmd::AddToQueue(tracks))
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.send(PlayerCmd::ClearQueue)
    }

    /// Stop playback and wait for the player thread to exit.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
