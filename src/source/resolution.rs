//! The sequential-attempt state machine.
//!
//! A `Resolution` walks the candidate list for one track: each attempt
//! is stamped with a generation token by the engine, waits out a bounded
//! deadline for the resource to signal can-play or error, and advances
//! to the next candidate after a short settling delay. Running out of
//! candidates is a terminal, recoverable outcome; the engine reports it
//! to the user instead of propagating an error.

use std::time::{Duration, Instant};

use crate::track::TrackDescriptor;

use super::candidates::SourceLocation;

/// What the engine should do for this resolution on the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    /// Nothing due yet; keep ticking.
    Wait,
    /// Begin loading `current()` on the playback resource now.
    Begin,
    /// Every candidate failed.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    /// The next attempt is due immediately.
    Ready,
    /// An attempt is in flight; fail it if nothing arrives by `deadline`.
    Waiting { deadline: Instant },
    /// The previous attempt failed; settle before the next candidate.
    Settling { until: Instant },
}

/// An in-flight resolution for a single `play` request.
#[derive(Debug)]
pub struct Resolution {
    track: TrackDescriptor,
    candidates: Vec<SourceLocation>,
    index: usize,
    attempts_made: usize,
    generation: u64,
    phase: Phase,
    attempt_timeout: Duration,
    settle: Duration,
}

impl Resolution {
    /// Start a resolution over a non-empty candidate list. The caller is
    /// responsible for refusing tracks with no candidates up front.
    pub fn new(
        track: TrackDescriptor,
        candidates: Vec<SourceLocation>,
        attempt_timeout: Duration,
        settle: Duration,
    ) -> Self {
        debug_assert!(!candidates.is_empty());
        Self {
            track,
            candidates,
            index: 0,
            attempts_made: 0,
            generation: 0,
            phase: Phase::Ready,
            attempt_timeout,
            settle,
        }
    }

    pub fn track(&self) -> &TrackDescriptor {
        &self.track
    }

    /// The candidate the current (or next) attempt targets.
    pub fn current(&self) -> &SourceLocation {
        &self.candidates[self.index]
    }

    /// Generation token of the attempt in flight. Zero until the first
    /// attempt starts; the engine never issues generation zero.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How many attempts have been started so far.
    pub fn attempts_made(&self) -> usize {
        self.attempts_made
    }

    /// Record that the engine started loading `current()` under `generation`.
    pub fn started(&mut self, generation: u64, now: Instant) {
        self.generation = generation;
        self.attempts_made += 1;
        self.phase = Phase::Waiting {
            deadline: now + self.attempt_timeout,
        };
    }

    /// Fail the attempt in flight (error signal or hung-source timeout).
    /// Returns `true` when the candidate list is exhausted; otherwise the
    /// cursor advances and the next attempt becomes due after the
    /// settling delay. Only one failure per attempt counts; duplicate
    /// signals while settling are ignored.
    pub fn fail(&mut self, now: Instant) -> bool {
        if !matches!(self.phase, Phase::Waiting { .. }) {
            return false;
        }
        self.index += 1;
        if self.index >= self.candidates.len() {
            return true;
        }
        self.phase = Phase::Settling {
            until: now + self.settle,
        };
        false
    }

    /// Advance the state machine against the clock.
    pub fn step(&mut self, now: Instant) -> ResolutionStep {
        match self.phase {
            Phase::Ready => ResolutionStep::Begin,
            Phase::Waiting { deadline } => {
                if now >= deadline {
                    // Hung source: neither can-play nor error arrived in time.
                    if self.fail(now) {
                        ResolutionStep::Exhausted
                    } else {
                        ResolutionStep::Wait
                    }
                } else {
                    ResolutionStep::Wait
                }
            }
            Phase::Settling { until } => {
                if now >= until {
                    self.phase = Phase::Ready;
                    ResolutionStep::Begin
                } else {
                    ResolutionStep::Wait
                }
            }
        }
    }
}
