use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/attacca/config.toml` or `~/.config/attacca/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ATTACCA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub resolver: ResolverSettings,
    pub cache: CacheSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: PlayerSettings::default(),
            resolver: ResolverSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Initial output volume in `[0, 1]`.
    pub volume: f32,
    /// Whether the loop toggle starts enabled. Short preview clips loop
    /// by default, matching the streaming client's behavior.
    pub loop_enabled: bool,
    /// A track only loops when its reported duration is at or below this
    /// many seconds (preview-length clips). Longer tracks auto-advance
    /// regardless of the loop toggle.
    pub preview_loop_max_secs: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            loop_enabled: true,
            preview_loop_max_secs: 35.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Base URL of the backend API; the resolver derives the streaming
    /// endpoint for a track as `{api_base}/songs/{id}/stream`.
    pub api_base: String,
    /// How long to wait for a source to signal can-play or error before
    /// treating the attempt as failed (milliseconds).
    pub attempt_timeout_ms: u64,
    /// Settling delay between a failed attempt and the next candidate
    /// (milliseconds).
    pub settle_ms: u64,
    /// HTTP timeout for fetching a remote source (milliseconds).
    pub fetch_timeout_ms: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api/v1".to_string(),
            attempt_timeout_ms: 1000,
            settle_ms: 150,
            fetch_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory scanned for locally-cached audio, keyed by file stem
    /// (`{track id}.mp3`). Empty disables the scan.
    pub dir: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: String::new(),
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
        }
    }
}
