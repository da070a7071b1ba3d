//! Playback resource adapter: the single point of contact with the
//! underlying audio output.
//!
//! The engine never touches the audio subsystem directly; it drives a
//! `PlaybackResource` and reacts to the events drained from `poll`. The
//! production implementation sits on `rodio`; tests substitute a fake.

mod output;
mod types;

pub use output::*;
pub use types::*;
