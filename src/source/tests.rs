use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::track::TrackDescriptor;

use super::*;

fn full_track() -> TrackDescriptor {
    TrackDescriptor {
        id: "7".into(),
        title: "Full".into(),
        preview_url: Some("https://cdn.example/x.mp3".into()),
        local_path: Some("/var/cache/attacca/7.mp3".into()),
        ..TrackDescriptor::default()
    }
}

const BASE: &str = "http://localhost:8000/api/v1";

#[test]
fn classify_splits_urls_and_paths() {
    assert_eq!(
        SourceLocation::classify("https://cdn.example/a.mp3"),
        SourceLocation::Remote("https://cdn.example/a.mp3".into())
    );
    assert_eq!(
        SourceLocation::classify("http://host/b.mp3"),
        SourceLocation::Remote("http://host/b.mp3".into())
    );
    assert_eq!(
        SourceLocation::classify("/music/c.flac"),
        SourceLocation::Local(PathBuf::from("/music/c.flac"))
    );
    // Leading/trailing whitespace is not part of the location.
    assert_eq!(
        SourceLocation::classify("  /music/d.ogg "),
        SourceLocation::Local(PathBuf::from("/music/d.ogg"))
    );
}

#[test]
fn stream_url_handles_trailing_slash() {
    assert_eq!(stream_url(BASE, "42"), format!("{BASE}/songs/42/stream"));
    assert_eq!(
        stream_url("https://music.example/api/", "42"),
        "https://music.example/api/songs/42/stream"
    );
}

#[test]
fn candidates_are_preview_then_stream_then_local() {
    let c = candidates_for(&full_track(), BASE);
    assert_eq!(
        c,
        vec![
            SourceLocation::Remote("https://cdn.example/x.mp3".into()),
            SourceLocation::Remote(format!("{BASE}/songs/7/stream")),
            SourceLocation::Local(PathBuf::from("/var/cache/attacca/7.mp3")),
        ]
    );
}

#[test]
fn empty_fields_produce_no_candidates() {
    let mut track = full_track();
    track.preview_url = Some("".into());
    track.local_path = None;
    assert_eq!(
        candidates_for(&track, BASE),
        vec![SourceLocation::Remote(format!("{BASE}/songs/7/stream"))]
    );

    let bare = TrackDescriptor::default();
    assert!(candidates_for(&bare, BASE).is_empty());
}

#[test]
fn id_only_track_gets_the_derived_endpoint() {
    let track = TrackDescriptor {
        id: "42".into(),
        preview_url: Some("".into()),
        local_path: Some("".into()),
        ..TrackDescriptor::default()
    };
    assert_eq!(
        candidates_for(&track, BASE),
        vec![SourceLocation::Remote(format!("{BASE}/songs/42/stream"))]
    );
}

fn resolution(candidates: usize) -> Resolution {
    let locs = (0..candidates)
        .map(|i| SourceLocation::Remote(format!("https://cdn.example/{i}.mp3")))
        .collect();
    Resolution::new(
        full_track(),
        locs,
        Duration::from_millis(1000),
        Duration::from_millis(150),
    )
}

#[test]
fn resolution_begins_immediately_then_waits() {
    let mut r = resolution(2);
    let t0 = Instant::now();

    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);
    assert_eq!(r.generation(), 1);
    assert_eq!(r.attempts_made(), 1);

    // Inside the deadline nothing is due.
    assert_eq!(r.step(t0 + Duration::from_millis(500)), ResolutionStep::Wait);
}

#[test]
fn error_advances_after_settle_delay() {
    let mut r = resolution(2);
    let t0 = Instant::now();
    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);

    let exhausted = r.fail(t0 + Duration::from_millis(100));
    assert!(!exhausted);

    // Still settling.
    assert_eq!(r.step(t0 + Duration::from_millis(200)), ResolutionStep::Wait);
    // Settle elapsed: the next candidate is due.
    assert_eq!(r.step(t0 + Duration::from_millis(300)), ResolutionStep::Begin);
    assert_eq!(
        r.current(),
        &SourceLocation::Remote("https://cdn.example/1.mp3".into())
    );
}

#[test]
fn hung_source_times_out_and_advances() {
    let mut r = resolution(2);
    let t0 = Instant::now();
    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);

    // No can-play and no error within the bounded wait.
    assert_eq!(r.step(t0 + Duration::from_millis(1001)), ResolutionStep::Wait);
    assert_eq!(r.step(t0 + Duration::from_millis(1200)), ResolutionStep::Begin);
    r.started(2, t0 + Duration::from_millis(1200));
    assert_eq!(r.attempts_made(), 2);
}

#[test]
fn duplicate_failure_signals_advance_only_once() {
    let mut r = resolution(3);
    let t0 = Instant::now();
    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);

    assert!(!r.fail(t0 + Duration::from_millis(50)));
    // A second failure for the same attempt (already settling) is a
    // duplicate and must not skip a candidate.
    assert!(!r.fail(t0 + Duration::from_millis(60)));

    assert_eq!(r.step(t0 + Duration::from_millis(250)), ResolutionStep::Begin);
    assert_eq!(
        r.current(),
        &SourceLocation::Remote("https://cdn.example/1.mp3".into())
    );
}

#[test]
fn single_candidate_failure_is_immediate_exhaustion() {
    let mut r = resolution(1);
    let t0 = Instant::now();
    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);

    assert!(r.fail(t0 + Duration::from_millis(50)));
}

#[test]
fn timing_out_the_last_candidate_reports_exhausted() {
    let mut r = resolution(1);
    let t0 = Instant::now();
    assert_eq!(r.step(t0), ResolutionStep::Begin);
    r.started(1, t0);

    assert_eq!(
        r.step(t0 + Duration::from_millis(1500)),
        ResolutionStep::Exhausted
    );
}
