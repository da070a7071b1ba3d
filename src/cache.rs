//! Local audio cache.
//!
//! Scans a configured directory for downloaded audio keyed by file stem
//! (`{track id}.mp3`) and fills in `local_path` on track descriptors so
//! the resolver can fall back to cached files when the network sources
//! are unavailable.

mod scan;

pub use scan::{CacheIndex, CachedAudio};

#[cfg(test)]
mod tests;
