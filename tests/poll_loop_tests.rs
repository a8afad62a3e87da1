use std::fs::{self, File};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime};
use synthriders_rpc::config::Config;
use synthriders_rpc::core::events::{GameEvent, SharedSongState};
use synthriders_rpc::core::poll::{GameState, PollLoop, TickOutcome};
use synthriders_rpc::core::subtitles::SubtitleWriter;
use synthriders_rpc::presence::PresenceClient;

mod common;
use common::{Call, FakeProbe, RecordingTransport, setup_test_dir, test_config, write_status, write_synth_db};

const SESSION: i64 = 1_700_000_000;

fn poll_loop(cfg: Config, probe: FakeProbe) -> (PollLoop, RecordingTransport) {
    let transport = RecordingTransport::new();
    let client = PresenceClient::new(Box::new(transport.clone()));
    let poll = PollLoop::new(cfg, client, Box::new(probe)).with_session_start(SESSION);
    (poll, transport)
}

fn set_mtime(path: &std::path::Path, secs_ago: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
        .unwrap();
}

#[test]
fn test_no_process_waits_without_touching_discord() {
    let dir = setup_test_dir("poll_no_process");
    let (mut poll, transport) = poll_loop(test_config(&dir), FakeProbe::new(vec![None]));

    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(15)));
    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(15)));
    assert_eq!(poll.game_state(), GameState::NoProcess);
    assert!(poll.last_payload().is_none());
    assert!(transport.calls().is_empty());
}

#[test]
fn test_running_game_without_song_shows_idle() {
    let dir = setup_test_dir("poll_idle");
    let (mut poll, transport) = poll_loop(test_config(&dir), FakeProbe::running());

    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(5)));
    assert_eq!(poll.game_state(), GameState::ProcessRunning);
    assert!(poll.is_connected());

    let updates = transport.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].details, "looking for a song to play");
    assert_eq!(updates[0].start, Some(SESSION));
}

#[test]
fn test_running_game_with_song_is_enriched() {
    let dir = setup_test_dir("poll_song");
    let db = write_synth_db(&dir);
    write_status(&dir, "Berzerk by Eminem\nMaster (mapped by Kaizen)");

    let cfg = Config {
        synth_db_path: Some(db.to_string_lossy().to_string()),
        ..test_config(&dir)
    };
    let (mut poll, transport) = poll_loop(cfg, FakeProbe::running());

    poll.tick();
    poll.tick();

    let updates = transport.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].details, "Berzerk by Eminem");
    assert_eq!(updates[0].state, "Master | 140 BPM | Mapped by Kaizen");
    assert_eq!(updates[0].progress_len(), Some(180));
    // unchanged file keeps the same start instant
    assert_eq!(updates[0].start, updates[1].start);
}

#[test]
fn test_game_exit_pushes_idle_then_disconnects() {
    let dir = setup_test_dir("poll_exit");
    write_status(&dir, "Berzerk by Eminem\nMaster (mapped by Kaizen)");
    let (mut poll, transport) = poll_loop(test_config(&dir), FakeProbe::new(vec![Some(1), None]));

    assert!(matches!(poll.tick(), TickOutcome::Continue(_)));
    assert_eq!(poll.tick(), TickOutcome::Finished);
    assert_eq!(poll.game_state(), GameState::NoProcess);
    assert!(!poll.is_connected());

    let calls = transport.calls();
    assert_eq!(calls.first(), Some(&Call::Connect));
    assert_eq!(calls.last(), Some(&Call::Close));
    let updates = transport.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].details, "Berzerk by Eminem");
    assert_eq!(updates[1].details, "looking for a song to play");
}

#[test]
fn test_keep_running_after_exit_goes_back_to_waiting() {
    let dir = setup_test_dir("poll_keep_running");
    let cfg = Config {
        keep_running_after_exit: true,
        ..test_config(&dir)
    };
    let (mut poll, transport) = poll_loop(cfg, FakeProbe::new(vec![Some(1), None, None, Some(2)]));

    poll.tick();
    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(15)));
    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(15)));

    // game comes back: reconnect and push again
    poll.tick();
    assert_eq!(poll.game_state(), GameState::ProcessRunning);
    let connects = transport
        .calls()
        .iter()
        .filter(|c| **c == Call::Connect)
        .count();
    assert_eq!(connects, 2);
}

#[test]
fn test_transport_down_does_not_stop_the_loop() {
    let dir = setup_test_dir("poll_transport_down");
    let (mut poll, transport) = poll_loop(test_config(&dir), FakeProbe::running());
    transport.set_fail_connect(true);

    assert_eq!(poll.tick(), TickOutcome::Continue(Duration::from_secs(5)));
    assert!(!poll.is_connected());
    assert!(poll.last_payload().is_some());

    transport.set_fail_connect(false);
    poll.tick();
    assert!(poll.is_connected());
    assert_eq!(transport.updates().len(), 1);
}

#[test]
fn test_live_song_wins_over_status_file() {
    let dir = setup_test_dir("poll_live");
    write_status(&dir, "Berzerk by Eminem\nMaster (mapped by Kaizen)");

    let live = Arc::new(SharedSongState::new());
    live.apply(
        &GameEvent::from_json(
            r#"{"eventType":"SongStart","data":{"song":"Eden","author":"Au5","difficulty":"Hard","beatMapper":"OST","length":200.0}}"#,
        )
        .unwrap(),
    );

    let (poll, transport) = poll_loop(test_config(&dir), FakeProbe::running());
    let mut poll = poll.with_live_state(Arc::clone(&live));

    poll.tick();
    let p = poll.last_payload().unwrap().clone();
    assert_eq!(p.details, "Eden by Au5");
    assert_eq!(p.state, "Hard | Mapped by OST");
    assert_eq!(p.progress_len(), Some(200));

    // song over: fall back to the file
    live.apply(&GameEvent::SongEnd);
    poll.tick();
    assert_eq!(transport.updates()[1].details, "Berzerk by Eminem");
}

#[test]
fn test_live_song_without_length_uses_store_duration() {
    let dir = setup_test_dir("poll_live_duration");
    let db = write_synth_db(&dir);

    let live = Arc::new(SharedSongState::new());
    live.apply(
        &GameEvent::from_json(
            r#"{"eventType":"SongStart","data":{"song":"Eden","author":"Au5","difficulty":"Hard","beatMapper":"OST","length":0}}"#,
        )
        .unwrap(),
    );

    let cfg = Config {
        synth_db_path: Some(db.to_string_lossy().to_string()),
        ..test_config(&dir)
    };
    let (poll, _transport) = poll_loop(cfg, FakeProbe::running());
    let mut poll = poll.with_live_state(live);

    poll.tick();
    let p = poll.last_payload().unwrap();
    assert_eq!(p.state, "Hard | 128 BPM | Mapped by OST");
    assert_eq!(p.progress_len(), Some(200));
}

#[test]
fn test_run_stops_when_game_closes() {
    let dir = setup_test_dir("poll_run");
    let cfg = Config {
        running_poll_secs: 1,
        ..test_config(&dir)
    };
    let (mut poll, transport) = poll_loop(cfg, FakeProbe::new(vec![Some(1), None]));

    poll.run();

    assert_eq!(transport.updates().len(), 2);
    assert_eq!(transport.calls().last(), Some(&Call::Close));
}

#[test]
fn test_run_returns_immediately_when_stopped() {
    let dir = setup_test_dir("poll_stopped");
    let stop = Arc::new(AtomicBool::new(true));
    let (poll, transport) = poll_loop(test_config(&dir), FakeProbe::running());
    let mut poll = poll.with_stop_flag(stop);

    poll.run();
    assert!(transport.calls().is_empty());
}

#[test]
fn test_song_changes_are_written_as_subtitles() {
    let dir = setup_test_dir("poll_subtitles");
    let status = write_status(&dir, "Berzerk by Eminem\nMaster (mapped by Kaizen)");
    set_mtime(&status, 60);

    let srt = dir.join("session.srt");
    let (poll, _transport) = poll_loop(
        test_config(&dir),
        FakeProbe::new(vec![Some(1), Some(1), None]),
    );
    let mut poll = poll.with_subtitles(SubtitleWriter::new(&srt));

    poll.tick();
    fs::write(&status, "Eden by Au5\nHard (mapped by OST)").unwrap();
    set_mtime(&status, 30);
    poll.tick();
    poll.tick();

    let content = fs::read_to_string(&srt).unwrap();
    assert!(content.starts_with("1\n00:00:00,"));
    assert!(content.contains("Berzerk by Eminem [Master]"));
    assert!(content.contains("\n2\n"));
    assert!(content.contains("Eden by Au5 [Hard]"));
}
