use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::CacheSettings;
use crate::track::TrackDescriptor;

/// One cached audio file, keyed in the index by its file stem.
#[derive(Debug, Clone)]
pub struct CachedAudio {
    pub path: PathBuf,
    /// Probed from the file's headers; `None` when probing failed.
    pub duration: Option<Duration>,
}

/// Track id to cached file mapping built from one directory scan.
#[derive(Debug, Default)]
pub struct CacheIndex {
    entries: HashMap<String, CachedAudio>,
}

fn is_audio_file(path: &Path, settings: &CacheSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl CacheIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan the configured cache directory. An empty `dir` disables the
    /// cache; a missing directory yields an empty index with a warning
    /// rather than an error, since the cache is strictly best-effort.
    pub fn scan(settings: &CacheSettings) -> Self {
        let dir = settings.dir.trim();
        if dir.is_empty() {
            return Self::empty();
        }
        let root = Path::new(dir);
        if !root.is_dir() {
            warn!(dir, "cache directory does not exist, skipping scan");
            return Self::empty();
        }

        let mut entries: HashMap<String, CachedAudio> = HashMap::new();
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || !is_audio_file(path, settings) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if entries.contains_key(id) {
                debug!(id, path = %path.display(), "duplicate cache entry, keeping first");
                continue;
            }

            let duration = lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration());

            entries.insert(
                id.to_string(),
                CachedAudio {
                    path: path.to_path_buf(),
                    duration,
                },
            );
        }

        debug!(dir, entries = entries.len(), "cache scan complete");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, id: &str) -> Option<&CachedAudio> {
        if id.trim().is_empty() {
            return None;
        }
        self.entries.get(id)
    }

    /// Fill in `local_path` (and a missing duration hint) on descriptors
    /// whose id has a cached file. Descriptor fields already set are left
    /// alone; the cache only supplements.
    pub fn apply(&self, tracks: &mut [TrackDescriptor]) {
        for track in tracks {
            let Some(cached) = self.lookup(&track.id) else {
                continue;
            };
            let has_local = track
                .local_path
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !has_local {
                track.local_path = Some(cached.path.to_string_lossy().into_owned());
            }
            if track.duration_hint.is_none() {
                track.duration_hint = cached.duration.map(|d| d.as_secs_f64());
            }
        }
    }
}
