//! Process startup and the interactive console front end.
//!
//! Loads configuration and the tracklist, fills in cached local sources,
//! spins up the player thread and the MPRIS service, then hands control
//! to the line-oriented console loop.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::cache::CacheIndex;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::player::Player;
use crate::track::load_tracklist;

mod repl;

pub fn run() -> Result<()> {
    let settings = Settings::load()?;
    settings.validate().map_err(Error::InvalidConfig)?;

    let tracklist = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tracks.toml"));
    let mut tracks = load_tracklist(&tracklist)?;
    info!(path = %tracklist.display(), tracks = tracks.len(), "tracklist loaded");
    let unplayable = tracks.iter().filter(|t| !t.is_playable()).count();
    if unplayable > 0 {
        warn!(unplayable, "tracklist entries without any source field");
    }

    let cache = CacheIndex::scan(&settings.cache);
    if !cache.is_empty() {
        info!(entries = cache.len(), "local audio cache indexed");
    }
    cache.apply(&mut tracks);

    let player = Player::new(&settings);
    player.add_to_queue(tracks.clone())?;
    crate::mpris::spawn_mpris(player.command_sender(), player.state_handle());

    let result = repl::run(&player, &tracks);
    player.quit();
    result
}
