#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rusqlite::{Connection, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use synthriders_rpc::config::Config;
use synthriders_rpc::errors::{AppError, AppResult};
use synthriders_rpc::models::PresencePayload;
use synthriders_rpc::presence::PresenceTransport;
use synthriders_rpc::utils::process::ProcessProbe;

pub fn srr() -> Command {
    cargo_bin_cmd!("synthriders-rpc")
}

/// Create an empty per-test directory inside the system temp dir
pub fn setup_test_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_synthriders_rpc", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test dir");
    path
}

pub fn write_status(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("SongStatusOutput.txt");
    fs::write(&path, content).expect("write status file");
    path
}

/// Config pointing every path into `dir`, with network features off.
pub fn test_config(dir: &Path) -> Config {
    Config {
        song_status_path: dir.join("SongStatusOutput.txt").to_string_lossy().to_string(),
        cover_image_path: dir.join("SongStatusImage.png").to_string_lossy().to_string(),
        synth_db_path: None,
        show_update_notice: false,
        upload_cover_images: false,
        ..Config::default()
    }
}

pub fn write_config(dir: &Path, cfg: &Config) -> PathBuf {
    let path = dir.join("config.json");
    cfg.save(&path).expect("save config");
    path
}

pub fn create_tracks_table(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE TracksCache (
            id INTEGER PRIMARY KEY,
            file_name TEXT,
            song_name TEXT,
            author TEXT,
            beatmapper TEXT,
            bpm INTEGER,
            image_file TEXT,
            notes_count INTEGER,
            duration INTEGER,
            date_created INTEGER
        );",
    )
    .expect("create TracksCache");
}

#[allow(clippy::too_many_arguments)]
pub fn insert_track(
    conn: &Connection,
    id: i64,
    file_name: &str,
    song: &str,
    author: &str,
    mapper: &str,
    bpm: Option<i64>,
    duration: Option<i64>,
    date_created: i64,
) {
    conn.execute(
        "INSERT INTO TracksCache (id, file_name, song_name, author, beatmapper, bpm, image_file, notes_count, duration, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, 0, ?7, ?8)",
        params![id, file_name, song, author, mapper, bpm, duration, date_created],
    )
    .expect("insert track");
}

/// SynthDB with a custom map (Berzerk), an older remix and an official track (Eden).
pub fn write_synth_db(dir: &Path) -> PathBuf {
    let path = dir.join("SynthDB");
    fs::remove_file(&path).ok();
    let conn = Connection::open(&path).expect("open SynthDB");
    create_tracks_table(&conn);
    insert_track(&conn, 1, "Berzerk.synth", "Berzerk", "Eminem", "Kaizen", Some(140), Some(180), 2000);
    insert_track(&conn, 2, "BerzerkRemix.synth", "Berzerk (Remix)", "Eminem", "Someone", Some(90), Some(240), 1000);
    insert_track(&conn, 3, "eden_official", "Eden", "Au5 & Danyka Nadeau", "OST", Some(128), Some(200), 500);
    path
}

/// Probe answering from a script; the last answer repeats once the script runs out.
pub struct FakeProbe {
    answers: Vec<Option<u32>>,
    next: usize,
}

impl FakeProbe {
    pub fn new(answers: Vec<Option<u32>>) -> Self {
        Self { answers, next: 0 }
    }

    pub fn running() -> Self {
        Self::new(vec![Some(4242)])
    }
}

impl ProcessProbe for FakeProbe {
    fn find(&mut self) -> Option<u32> {
        let idx = self.next.min(self.answers.len().saturating_sub(1));
        self.next += 1;
        self.answers.get(idx).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect,
    Update(PresencePayload),
    Clear,
    Close,
}

/// Transport double recording every call into a shared log.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_connect: Arc<Mutex<bool>>,
    pub fail_update: Arc<Mutex<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<PresencePayload> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_connect(&self, fail: bool) {
        *self.fail_connect.lock().unwrap() = fail;
    }

    pub fn set_fail_update(&self, fail: bool) {
        *self.fail_update.lock().unwrap() = fail;
    }
}

impl PresenceTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "Recording"
    }

    fn connect(&mut self) -> AppResult<()> {
        self.calls.lock().unwrap().push(Call::Connect);
        if *self.fail_connect.lock().unwrap() {
            return Err(AppError::Transport("connect refused".into()));
        }
        Ok(())
    }

    fn update(&mut self, payload: &PresencePayload) -> AppResult<()> {
        self.calls.lock().unwrap().push(Call::Update(payload.clone()));
        if *self.fail_update.lock().unwrap() {
            return Err(AppError::Transport("pipe closed".into()));
        }
        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        self.calls.lock().unwrap().push(Call::Clear);
        Ok(())
    }

    fn close(&mut self) {
        self.calls.lock().unwrap().push(Call::Close);
    }
}
