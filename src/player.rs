//! The player: state machine, queue and facade.
//!
//! A single engine thread owns the playback resource and all session
//! state. The `Player` facade feeds it commands over an mpsc channel and
//! publishes reactive state behind a shared handle; UI layers only read
//! that state and send the documented commands.

mod engine;
mod facade;
mod queue;
mod types;

pub use facade::*;
pub use types::*;
