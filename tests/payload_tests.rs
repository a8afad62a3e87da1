use synthriders_rpc::config::Config;
use synthriders_rpc::core::enrich::MetadataEnricher;
use synthriders_rpc::core::payload::{build, state_line};
use synthriders_rpc::core::watcher::SongStatusWatcher;
use synthriders_rpc::models::{EnrichedRecord, SongDetails, StatusRecord};

mod common;
use common::{setup_test_dir, write_status, write_synth_db};

const SESSION: i64 = 1_700_000_000;

fn status(title: &str, artist: &str) -> StatusRecord {
    StatusRecord {
        title: title.into(),
        artist: artist.into(),
        difficulty: "Expert".into(),
        mapper: "Kaizen".into(),
        has_cover_image: false,
        cover_image_path: None,
    }
}

fn details(bpm: Option<i64>, duration: Option<i64>) -> SongDetails {
    SongDetails {
        id: 1,
        file_name: Some("x.synth".into()),
        title: "Berzerk".into(),
        author: "Eminem".into(),
        mapper: Some("Kaizen".into()),
        bpm,
        duration,
        date_created: Some(1),
        is_custom: true,
    }
}

#[test]
fn test_idle_payload() {
    let cfg = Config::default();
    let p = build(None, &cfg, SESSION);

    assert_eq!(p.details, "looking for a song to play");
    assert_eq!(p.state, "Idle");
    assert_eq!(p.large_image, cfg.large_image);
    assert_eq!(p.large_text, "Synth Riders");
    assert_eq!(p.start, Some(SESSION));
    assert_eq!(p.end, None);
    assert_eq!(p.buttons.len(), 1);
    assert_eq!(p.buttons[0].label, "Synth Riders");
    assert_eq!(p.buttons[0].url, "https://synthridersvr.com");
}

#[test]
fn test_song_without_details_uses_session_start() {
    let cfg = Config::default();
    let record = EnrichedRecord::from_status(status("Berzerk", "Eminem"));
    let p = build(Some(&record), &cfg, SESSION);

    assert_eq!(p.details, "Berzerk by Eminem");
    assert_eq!(p.state, "Expert | Mapped by Kaizen");
    assert_eq!(p.start, Some(SESSION));
    assert_eq!(p.end, None);
    assert!(p.small_image.is_none());
}

#[test]
fn test_song_with_details_gets_bpm_and_progress_window() {
    let cfg = Config::default();
    let record = EnrichedRecord::from_status(status("Berzerk", "Eminem"))
        .with_details(Some(&details(Some(140), Some(180))))
        .with_started_at(Some(SESSION + 30));
    let p = build(Some(&record), &cfg, SESSION);

    assert_eq!(p.state, "Expert | 140 BPM | Mapped by Kaizen");
    assert_eq!(p.start, Some(SESSION + 30));
    assert_eq!(p.end, Some(SESSION + 30 + 180));
    assert_eq!(p.progress_len(), Some(180));
}

#[test]
fn test_zero_bpm_and_duration_are_ignored() {
    let cfg = Config::default();
    let record = EnrichedRecord::from_status(status("Berzerk", "Eminem"))
        .with_details(Some(&details(Some(0), Some(0))))
        .with_started_at(Some(SESSION + 30));

    assert_eq!(record.bpm, None);
    assert_eq!(record.duration_seconds, None);
    assert!(record.is_custom_content);

    let p = build(Some(&record), &cfg, SESSION);
    assert_eq!(p.state, "Expert | Mapped by Kaizen");
    assert_eq!(p.start, Some(SESSION));
    assert_eq!(p.end, None);
}

#[test]
fn test_uploaded_cover_becomes_large_image() {
    let cfg = Config::default();
    let record = EnrichedRecord::from_status(status("Berzerk", "Eminem"))
        .with_cover_url(Some("https://a.uguu.se/abc.png".into()));
    let p = build(Some(&record), &cfg, SESSION);

    assert_eq!(p.large_image, "https://a.uguu.se/abc.png");
    assert_eq!(p.large_text, "Berzerk by Eminem");
    assert_eq!(p.small_image.as_deref(), Some(cfg.small_image.as_str()));
    assert_eq!(p.small_text.as_deref(), Some("Synth Riders"));
}

#[test]
fn test_buttons_can_be_disabled() {
    let cfg = Config {
        show_button: false,
        ..Config::default()
    };
    assert!(build(None, &cfg, SESSION).buttons.is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let cfg = Config::default();
    let record = EnrichedRecord::from_status(status("Berzerk", "Eminem"))
        .with_details(Some(&details(Some(140), Some(180))))
        .with_started_at(Some(SESSION));

    assert_eq!(
        build(Some(&record), &cfg, SESSION),
        build(Some(&record), &cfg, SESSION)
    );
    assert_eq!(state_line(&record), "Expert | 140 BPM | Mapped by Kaizen");
}

#[test]
fn test_status_file_to_payload_end_to_end() {
    let dir = setup_test_dir("payload_eden");
    let db = write_synth_db(&dir);
    let status_path = write_status(&dir, "Eden by Au5 & Danyka Nadeau\nExpert (mapped by OST)\n");

    let watcher = SongStatusWatcher::new(&status_path, dir.join("SongStatusImage.png"));
    let enricher = MetadataEnricher::new(Some(db));

    let status = watcher.parse().unwrap().unwrap();
    let found = enricher.enrich(&status.title, &status.artist).unwrap();
    let record = EnrichedRecord::from_status(status)
        .with_details(found.as_ref())
        .with_started_at(Some(SESSION + 5));

    let p = build(Some(&record), &Config::default(), SESSION);
    assert_eq!(p.details, "Eden by Au5 & Danyka Nadeau");
    assert_eq!(p.state, "Expert | 128 BPM | Mapped by OST");
    assert_eq!(p.start, Some(SESSION + 5));
    assert_eq!(p.end, Some(SESSION + 205));
}
