use super::*;

fn t(id: &str) -> TrackDescriptor {
    TrackDescriptor {
        id: id.into(),
        title: format!("Track {id}"),
        ..TrackDescriptor::default()
    }
}

#[test]
fn playability_requires_a_candidate_field() {
    assert!(!TrackDescriptor::default().is_playable());
    assert!(t("42").is_playable());

    let preview_only = TrackDescriptor {
        preview_url: Some("https://cdn.example/x.mp3".into()),
        ..TrackDescriptor::default()
    };
    assert!(preview_only.is_playable());

    let local_only = TrackDescriptor {
        local_path: Some("/var/cache/attacca/7.mp3".into()),
        ..TrackDescriptor::default()
    };
    assert!(local_only.is_playable());

    // Whitespace-only fields do not count.
    let blank = TrackDescriptor {
        id: "  ".into(),
        preview_url: Some("".into()),
        local_path: Some("   ".into()),
        ..TrackDescriptor::default()
    };
    assert!(!blank.is_playable());
}

#[test]
fn same_id_never_matches_empty_ids() {
    assert!(t("7").same_id(&t("7")));
    assert!(!t("7").same_id(&t("8")));
    assert!(!t("").same_id(&t("")));
}

#[test]
fn display_prefers_artist_dash_title() {
    let mut track = t("1");
    track.title = "Blackened".into();
    assert_eq!(track.display(), "Blackened");

    track.artist = Some("Metallica".into());
    assert_eq!(track.display(), "Metallica - Blackened");

    track.artist = Some("   ".into());
    assert_eq!(track.display(), "Blackened");
}

#[test]
fn parse_tracklist_reads_track_tables() {
    let text = r#"
        [[track]]
        id = "42"
        title = "First"
        preview_url = "https://cdn.example/42.mp3"

        [[track]]
        title = "Local only"
        local_path = "/music/local.flac"
        duration_hint = 31.5
    "#;

    let tracks = parse_tracklist(text).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "42");
    assert_eq!(
        tracks[0].preview_url.as_deref(),
        Some("https://cdn.example/42.mp3")
    );
    assert!(tracks[1].id.is_empty());
    assert_eq!(
        tracks[1].duration_hint(),
        Some(std::time::Duration::from_secs_f64(31.5))
    );
}

#[test]
fn parse_tracklist_rejects_bad_toml() {
    assert!(parse_tracklist("[[track]\nid = 3").is_err());
}

#[test]
fn parse_tracklist_allows_empty_file() {
    assert!(parse_tracklist("").unwrap().is_empty());
}
