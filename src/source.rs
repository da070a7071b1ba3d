//! Source resolution: turn a track descriptor into an ordered list of
//! candidate audio locations and drive sequential attempts against the
//! playback resource until one starts or all fail.

mod candidates;
mod resolution;

pub use candidates::*;
pub use resolution::*;

#[cfg(test)]
mod tests;
