//! The `TrackDescriptor` model.

use std::time::Duration;

use serde::Deserialize;

/// A playable song: display metadata plus candidate source fields.
///
/// A descriptor is playable when at least one of `id`, `preview_url` or
/// `local_path` is non-empty; the player refuses anything else before
/// touching the playback resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackDescriptor {
    /// Opaque identifier. Used for queue identity matching and for
    /// deriving the streaming endpoint URL. May be empty.
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Display-only length hint in seconds. The authoritative duration
    /// comes from the loaded media, never from here.
    pub duration_hint: Option<f64>,
    /// Optional cover art location.
    pub image_url: Option<String>,
    /// Optional externally-hosted audio location (e.g. a preview clip).
    pub preview_url: Option<String>,
    /// Optional locally-cached audio location.
    pub local_path: Option<String>,
}

impl Default for TrackDescriptor {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            artist: None,
            album: None,
            genre: None,
            duration_hint: None,
            image_url: None,
            preview_url: None,
            local_path: None,
        }
    }
}

fn non_empty(s: Option<&str>) -> bool {
    s.map(str::trim).is_some_and(|s| !s.is_empty())
}

impl TrackDescriptor {
    /// True when the descriptor has at least one candidate source field.
    pub fn is_playable(&self) -> bool {
        !self.id.trim().is_empty()
            || non_empty(self.preview_url.as_deref())
            || non_empty(self.local_path.as_deref())
    }

    /// Identity match by id. Empty ids never match anything, so tracks
    /// without an id are always "absent" for queue navigation.
    pub fn same_id(&self, other: &TrackDescriptor) -> bool {
        !self.id.trim().is_empty() && self.id == other.id
    }

    /// "Artist - Title" line for status output, falling back to the title
    /// (or id) alone.
    pub fn display(&self) -> String {
        let title = if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            self.title.as_str()
        };
        match self.artist.as_deref().map(str::trim) {
            Some(artist) if !artist.is_empty() => format!("{artist} - {title}"),
            _ => title.to_string(),
        }
    }

    /// The display-only length hint as a `Duration`, when present.
    pub fn duration_hint(&self) -> Option<Duration> {
        self.duration_hint
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(Duration::from_secs_f64)
    }
}
