//! Live song state fed by the game's event socket.
//!
//! The websocket thread writes through [`SharedSongState::apply`]; the poll
//! loop reads a [`SongState`] snapshot. Both take the same lock, for as long
//! as it takes to copy fields, and never across network or IPC calls.

use crate::errors::{AppError, AppResult};
use crate::models::enriched::EnrichedRecord;
use crate::models::status::StatusRecord;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Scene the game switches to after the results screen.
pub const GAME_END_SCENE: &str = "3.GameEnd";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStartData {
    #[serde(default = "unknown_song")]
    pub song: String,
    #[serde(default = "unknown_artist")]
    pub author: String,
    #[serde(default = "unknown")]
    pub difficulty: String,
    #[serde(default = "unknown_mapper")]
    pub beat_mapper: String,
    #[serde(default)]
    pub length: f64, // seconds
    #[serde(default)]
    pub album_art: Option<String>, // data:image/...;base64,...
}

fn unknown_song() -> String {
    "Unknown Song".to_string()
}
fn unknown_artist() -> String {
    "Unknown Artist".to_string()
}
fn unknown_mapper() -> String {
    "Unknown Mapper".to_string()
}
fn unknown() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "eventType")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
struct PlayTimeData {
    #[serde(rename = "playTimeMS", default)]
    play_time_ms: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteHitData {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    combo: i64,
    #[serde(default = "full_life")]
    life_bar_percent: f64,
}

fn full_life() -> f64 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneChangeData {
    #[serde(default)]
    scene_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SongStart(SongStartData),
    SongEnd,
    ReturnToMenu,
    PlayTime { play_time_ms: f64 },
    NoteHit { score: i64, combo: i64, life: f64 },
    SceneChange { scene_name: String },
    Unknown(String),
}

impl GameEvent {
    /// Decode one `{"eventType": ..., "data": {...}}` message.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let raw: RawEvent = serde_json::from_str(text)?;
        let data = match raw.data {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let decode_err = |e: serde_json::Error| {
            AppError::InvalidEvent(format!("{}: {}", raw.event_type, e))
        };

        let event = match raw.event_type.as_str() {
            "SongStart" => GameEvent::SongStart(serde_json::from_value(data).map_err(decode_err)?),
            "SongEnd" => GameEvent::SongEnd,
            "ReturnToMenu" => GameEvent::ReturnToMenu,
            "PlayTime" => {
                let d: PlayTimeData = serde_json::from_value(data).map_err(decode_err)?;
                GameEvent::PlayTime {
                    play_time_ms: d.play_time_ms,
                }
            }
            "NoteHit" => {
                let d: NoteHitData = serde_json::from_value(data).map_err(decode_err)?;
                GameEvent::NoteHit {
                    score: d.score,
                    combo: d.combo,
                    life: d.life_bar_percent,
                }
            }
            "SceneChange" => {
                let d: SceneChangeData = serde_json::from_value(data).map_err(decode_err)?;
                GameEvent::SceneChange {
                    scene_name: d.scene_name,
                }
            }
            other => GameEvent::Unknown(other.to_string()),
        };

        Ok(event)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSong {
    pub title: String,
    pub artist: String,
    pub difficulty: String,
    pub mapper: String,
    pub length_secs: f64,
    pub album_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongState {
    pub current: Option<LiveSong>,
    pub progress_secs: f64,
    pub score: i64,
    pub combo: i64,
    pub life: f64,
    /// Bumped on every SongStart; pairs async album-art uploads with their song.
    pub sequence: u64,
    pub connected: bool,
}

impl Default for SongState {
    fn default() -> Self {
        Self {
            current: None,
            progress_secs: 0.0,
            score: 0,
            combo: 0,
            life: 1.0,
            sequence: 0,
            connected: false,
        }
    }
}

impl SongState {
    /// The live song as a record the payload builder understands.
    /// Start instant is `now - progress`, so the progress bar follows the game.
    pub fn to_record(&self, now: i64) -> Option<EnrichedRecord> {
        let song = self.current.as_ref()?;

        let status = StatusRecord {
            title: song.title.clone(),
            artist: song.artist.clone(),
            difficulty: song.difficulty.clone(),
            mapper: song.mapper.clone(),
            has_cover_image: song.album_url.is_some(),
            cover_image_path: None,
        };

        let duration = (song.length_secs >= 1.0).then(|| song.length_secs.round() as i64);
        let started_at = now - self.progress_secs.max(0.0).round() as i64;

        Some(
            EnrichedRecord::from_status(status)
                .with_cover_url(song.album_url.clone())
                .with_started_at(Some(started_at))
                .with_duration(duration),
        )
    }
}

/// Album art that still needs uploading for song number `sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumArtUpload {
    pub sequence: u64,
    pub data_url: String,
}

#[derive(Debug, Default)]
pub struct SharedSongState {
    inner: Mutex<SongState>,
}

impl SharedSongState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SongState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one event. Returns the album art to upload, if the event carried one;
    /// the caller uploads without the lock and reports back via `set_album_url`.
    pub fn apply(&self, event: &GameEvent) -> Option<AlbumArtUpload> {
        let mut state = self.lock();

        match event {
            GameEvent::SongStart(data) => {
                state.sequence += 1;
                state.current = Some(LiveSong {
                    title: data.song.clone(),
                    artist: data.author.clone(),
                    difficulty: data.difficulty.clone(),
                    mapper: data.beat_mapper.clone(),
                    length_secs: data.length.max(0.0),
                    album_url: None,
                });
                state.progress_secs = 0.0;
                state.score = 0;
                state.combo = 0;
                state.life = 1.0;

                data.album_art
                    .as_ref()
                    .filter(|art| !art.is_empty())
                    .map(|art| AlbumArtUpload {
                        sequence: state.sequence,
                        data_url: art.clone(),
                    })
            }
            GameEvent::SongEnd | GameEvent::ReturnToMenu => {
                state.current = None;
                state.progress_secs = 0.0;
                None
            }
            GameEvent::PlayTime { play_time_ms } => {
                state.progress_secs = (play_time_ms / 1000.0).max(0.0);
                None
            }
            GameEvent::NoteHit { score, combo, life } => {
                state.score = *score;
                state.combo = *combo;
                state.life = *life;
                None
            }
            GameEvent::SceneChange { scene_name } => {
                if scene_name == GAME_END_SCENE {
                    state.current = None;
                }
                None
            }
            GameEvent::Unknown(_) => None,
        }
    }

    /// Store an uploaded cover URL if song `sequence` is still the current one.
    pub fn set_album_url(&self, sequence: u64, url: String) -> bool {
        let mut state = self.lock();
        if state.sequence != sequence {
            return false;
        }
        match state.current.as_mut() {
            Some(song) => {
                song.album_url = Some(url);
                true
            }
            None => false,
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    pub fn snapshot(&self) -> SongState {
        self.lock().clone()
    }
}
