use super::*;
use std::sync::{Arc, Mutex, mpsc};

use crate::player::SessionState;
use crate::track::TrackDescriptor;

fn iface_with_state() -> (PlayerIface, StateHandle, mpsc::Receiver<PlayerCmd>) {
    let state: StateHandle = Arc::new(Mutex::new(SessionState::new(1.0, true)));
    let (tx, rx) = mpsc::channel();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn playback_status_maps_phases_to_mpris_strings() {
    let (iface, state, _rx) = iface_with_state();

    for (phase, expected) in [
        (PlayerPhase::Idle, "Stopped"),
        (PlayerPhase::Loading, "Stopped"),
        (PlayerPhase::Playing, "Playing"),
        (PlayerPhase::Paused, "Paused"),
    ] {
        state.lock().unwrap().phase = phase;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn metadata_is_empty_without_a_current_track() {
    let (iface, _state, _rx) = iface_with_state();
    assert!(iface.metadata().is_empty());
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface_with_state();
    {
        let mut s = state.lock().unwrap();
        s.current_track = Some(TrackDescriptor {
            id: "7".into(),
            title: "Title".into(),
            artist: Some("Artist".into()),
            album: Some("Album".into()),
            ..TrackDescriptor::default()
        });
        s.duration = Some(Duration::from_secs(30));
    }

    let map = iface.metadata();
    for k in ["xesam:title", "xesam:artist", "xesam:album", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn controls_forward_player_commands() {
    let (iface, _state, rx) = iface_with_state();

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.pause();
    iface.play();

    let cmds: Vec<PlayerCmd> = rx.try_iter().collect();
    assert!(matches!(
        cmds.as_slice(),
        [
            PlayerCmd::TogglePlayPause,
            PlayerCmd::Next,
            PlayerCmd::Prev,
            PlayerCmd::Pause,
            PlayerCmd::Resume,
        ]
    ));
}
