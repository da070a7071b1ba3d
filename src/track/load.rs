//! Tracklist loading for the console front end.
//!
//! The tracklist is a TOML file of `[[track]]` tables:
//!
//! ```toml
//! [[track]]
//! id = "42"
//! title = "Song"
//! artist = "Artist"
//! preview_url = "https://cdn.example/previews/42.mp3"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

use super::model::TrackDescriptor;

#[derive(Debug, Deserialize)]
struct Tracklist {
    #[serde(default)]
    track: Vec<TrackDescriptor>,
}

/// Parse a tracklist from TOML text.
pub fn parse_tracklist(text: &str) -> Result<Vec<TrackDescriptor>> {
    let list: Tracklist =
        toml::from_str(text).map_err(|e| Error::Tracklist(e.to_string()))?;
    Ok(list.track)
}

/// Load a tracklist file from disk.
pub fn load_tracklist(path: &Path) -> Result<Vec<TrackDescriptor>> {
    let text = std::fs::read_to_string(path)?;
    parse_tracklist(&text)
}
