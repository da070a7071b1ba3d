//! Track descriptors: the data records describing playable songs.
//!
//! Descriptors arrive from outside the engine (a tracklist file here, a
//! REST backend in the full client) and are immutable while queued.

mod load;
mod model;

pub use load::*;
pub use model::*;

#[cfg(test)]
mod tests;
