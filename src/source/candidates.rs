//! Candidate source locations and their priority ordering.

use std::fmt;
use std::path::PathBuf;

use crate::track::TrackDescriptor;

/// One possible audio location for a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// An `http(s)` URL fetched over the network.
    Remote(String),
    /// A path on the local filesystem.
    Local(PathBuf),
}

impl SourceLocation {
    /// Classify a location string: `http://`/`https://` is remote,
    /// anything else is a local path. Cached "local path" fields arrive
    /// as plain strings, so the scheme is the only reliable signal.
    pub fn classify(location: &str) -> SourceLocation {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SourceLocation::Remote(trimmed.to_string())
        } else {
            SourceLocation::Local(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{url}"),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Derive the backend streaming endpoint for a track id.
pub fn stream_url(api_base: &str, id: &str) -> String {
    format!("{}/songs/{}/stream", api_base.trim_end_matches('/'), id)
}

/// Build the ordered candidate list for `track`:
///
/// 1. the preview URL, when present,
/// 2. the derived streaming endpoint, when the track has an id,
/// 3. the locally-cached path, when present.
///
/// All non-empty candidates are included and duplicates are left to
/// stand. An empty result means the track has no playable source.
pub fn candidates_for(track: &TrackDescriptor, api_base: &str) -> Vec<SourceLocation> {
    let mut candidates = Vec::new();

    if let Some(url) = track.preview_url.as_deref() {
        if !url.trim().is_empty() {
            candidates.push(SourceLocation::classify(url));
        }
    }

    let id = track.id.trim();
    if !id.is_empty() {
        candidates.push(SourceLocation::Remote(stream_url(api_base, id)));
    }

    if let Some(path) = track.local_path.as_deref() {
        if !path.trim().is_empty() {
            candidates.push(SourceLocation::classify(path));
        }
    }

    candidates
}
