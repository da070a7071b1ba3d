//! MPRIS (org.mpris.MediaPlayer2) bridge.
//!
//! Registers the player on the session bus so desktop media keys and
//! `playerctl` can drive it. Commands are forwarded over the player's
//! command channel; properties are read from the live session state.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::error;
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::player::{PlayerCmd, PlayerPhase, StateHandle};

const BUS_NAME: &str = "org.mpris.MediaPlayer2.attacca";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

struct RootIface {
    tx: Sender<PlayerCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // Nothing to raise for a headless player.
    }

    fn quit(&self) {
        let _ = self.tx.send(PlayerCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "attacca"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<PlayerCmd>,
    state: StateHandle,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(PlayerCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(PlayerCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(PlayerCmd::Resume);
    }

    fn pause(&self) {
        let _ = self.tx.send(PlayerCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(PlayerCmd::TogglePlayPause);
    }

    fn stop(&self) {
        // No dedicated stop; pausing is the closest observable state.
        let _ = self.tx.send(PlayerCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.phase {
            PlayerPhase::Playing => "Playing",
            PlayerPhase::Paused => "Paused",
            // Loading has no MPRIS equivalent; report it as stopped until
            // a source binds.
            PlayerPhase::Idle | PlayerPhase::Loading => "Stopped",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };
        let Some(track) = s.current_track.as_ref() else {
            return map;
        };

        insert_value(&mut map, "xesam:title", Value::from(track.title.clone()));
        if let Some(artist) = track.artist.clone() {
            insert_value(&mut map, "xesam:artist", Value::from(vec![artist]));
        }
        if let Some(album) = track.album.clone() {
            insert_value(&mut map, "xesam:album", Value::from(album));
        }
        if let Some(length) = s.duration {
            insert_value(
                &mut map,
                "mpris:length",
                Value::from(length.as_micros() as i64),
            );
        }
        map
    }
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(owned) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), owned);
    }
}

/// Register the MPRIS service on a dedicated thread. Bus failures are
/// logged and leave the player fully functional without media keys.
pub fn spawn_mpris(tx: Sender<PlayerCmd>, state: StateHandle) {
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    error!("mpris: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                error!("mpris: failed to acquire {BUS_NAME}: {e}");
                return;
            }

            let object_server = connection.object_server();
            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                error!("mpris: failed to register root interface: {e}");
                return;
            }
            if let Err(e) = object_server.at(OBJECT_PATH, PlayerIface { tx, state }).await {
                error!("mpris: failed to register player interface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });
}

#[cfg(test)]
mod tests;
