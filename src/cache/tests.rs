use std::fs;

use tempfile::tempdir;

use crate::config::CacheSettings;
use crate::track::TrackDescriptor;

use super::CacheIndex;

fn settings_for(dir: &std::path::Path) -> CacheSettings {
    CacheSettings {
        dir: dir.to_string_lossy().into_owned(),
        ..CacheSettings::default()
    }
}

#[test]
fn empty_dir_setting_disables_the_scan() {
    let index = CacheIndex::scan(&CacheSettings::default());
    assert!(index.is_empty());
}

#[test]
fn missing_directory_yields_an_empty_index() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("nope");
    let index = CacheIndex::scan(&settings_for(&gone));
    assert!(index.is_empty());
}

#[test]
fn scan_indexes_audio_files_by_stem() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("42.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("7.FLAC"), b"not a real flac").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"ignore me too").unwrap();

    let index = CacheIndex::scan(&settings_for(dir.path()));

    assert_eq!(index.len(), 2);
    assert!(index.lookup("42").is_some());
    assert!(index.lookup("7").is_some());
    assert!(index.lookup("notes").is_none());
    assert!(index.lookup(".hidden").is_none());
    // Unreadable headers: indexed, but without a duration.
    assert!(index.lookup("42").unwrap().duration.is_none());
}

#[test]
fn scan_descends_into_subdirectories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("albums");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("9.ogg"), b"not real").unwrap();

    let index = CacheIndex::scan(&settings_for(dir.path()));
    assert!(index.lookup("9").is_some());
}

#[test]
fn lookup_never_matches_an_empty_id() {
    let dir = tempdir().unwrap();
    let index = CacheIndex::scan(&settings_for(dir.path()));
    assert!(index.lookup("").is_none());
    assert!(index.lookup("   ").is_none());
}

#[test]
fn apply_fills_local_path_without_overwriting() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("2.mp3"), b"not real").unwrap();
    let index = CacheIndex::scan(&settings_for(dir.path()));

    let mut tracks = vec![
        TrackDescriptor {
            id: "1".into(),
            title: "Cached".into(),
            ..TrackDescriptor::default()
        },
        TrackDescriptor {
            id: "2".into(),
            title: "Already local".into(),
            local_path: Some("/elsewhere/2.mp3".into()),
            ..TrackDescriptor::default()
        },
        TrackDescriptor {
            id: "3".into(),
            title: "Not cached".into(),
            ..TrackDescriptor::default()
        },
    ];
    index.apply(&mut tracks);

    let expected = dir.path().join("1.mp3");
    assert_eq!(
        tracks[0].local_path.as_deref(),
        Some(expected.to_string_lossy().as_ref())
    );
    assert_eq!(tracks[1].local_path.as_deref(), Some("/elsewhere/2.mp3"));
    assert!(tracks[2].local_path.is_none());
}
