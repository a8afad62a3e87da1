//! Poll Loop: liveness check → status read → enrich → build → push → sleep.

use crate::config::Config;
use crate::core::enrich::MetadataEnricher;
use crate::core::events::SharedSongState;
use crate::core::payload;
use crate::core::subtitles::SubtitleWriter;
use crate::core::watcher::{SongStatusWatcher, StatusChange};
use crate::models::enriched::EnrichedRecord;
use crate::models::payload::PresencePayload;
use crate::models::song::SongDetails;
use crate::models::status::StatusRecord;
use crate::net::upload::ImageUploader;
use crate::presence::PresenceClient;
use crate::utils::process::ProcessProbe;
use crate::utils::time::{sleep_unless_stopped, unix_now};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NoProcess,
    ProcessRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sleep this long, then tick again.
    Continue(Duration),
    /// The game closed and we are not asked to keep running.
    Finished,
}

pub struct PollLoop {
    cfg: Config,
    watcher: SongStatusWatcher,
    enricher: MetadataEnricher,
    presence: PresenceClient,
    probe: Box<dyn ProcessProbe>,
    live: Option<Arc<SharedSongState>>,
    uploader: Option<ImageUploader>,
    subtitles: Option<SubtitleWriter>,
    stop: Arc<AtomicBool>,
    session_start: i64,
    game_state: GameState,
    file_song: Option<EnrichedRecord>,
    live_details: Option<((String, String), Option<SongDetails>)>,
    last_song: Option<String>,
    last_payload: Option<PresencePayload>,
}

impl PollLoop {
    pub fn new(cfg: Config, presence: PresenceClient, probe: Box<dyn ProcessProbe>) -> Self {
        let watcher = SongStatusWatcher::new(cfg.song_status_file(), cfg.cover_image_file());
        let enricher = MetadataEnricher::new(cfg.synth_db_file());

        Self {
            cfg,
            watcher,
            enricher,
            presence,
            probe,
            live: None,
            uploader: None,
            subtitles: None,
            stop: Arc::new(AtomicBool::new(false)),
            session_start: unix_now(),
            game_state: GameState::NoProcess,
            file_song: None,
            live_details: None,
            last_song: None,
            last_payload: None,
        }
    }

    pub fn with_live_state(mut self, live: Arc<SharedSongState>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_uploader(mut self, uploader: ImageUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_subtitles(mut self, subtitles: SubtitleWriter) -> Self {
        self.subtitles = Some(subtitles);
        self
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_session_start(mut self, session_start: i64) -> Self {
        self.session_start = session_start;
        self
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn session_start(&self) -> i64 {
        self.session_start
    }

    /// Payload pushed by the most recent tick.
    pub fn last_payload(&self) -> Option<&PresencePayload> {
        self.last_payload.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.presence.is_connected()
    }

    fn running_interval(&self) -> Duration {
        Duration::from_secs(self.cfg.running_poll_secs.max(1))
    }

    fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.cfg.idle_poll_secs.max(1))
    }

    /// One iteration. Every failure below is logged and degraded here.
    pub fn tick(&mut self) -> TickOutcome {
        match (self.game_state, self.probe.find()) {
            (state, Some(pid)) => {
                if state == GameState::NoProcess {
                    tracing::info!(
                        "{} is running (PID: {}). Executing RPC function.",
                        self.cfg.process_name,
                        pid
                    );
                    self.game_state = GameState::ProcessRunning;
                }

                self.refresh_file_song();
                let record = self.active_record();
                self.note_song(record.as_ref());

                let payload = payload::build(record.as_ref(), &self.cfg, self.session_start);
                self.push(payload);

                TickOutcome::Continue(self.running_interval())
            }
            (GameState::ProcessRunning, None) => {
                tracing::info!("{} closed", self.cfg.process_name);
                self.game_state = GameState::NoProcess;
                self.file_song = None;
                self.watcher.reset();
                self.note_song(None);

                let idle = payload::build(None, &self.cfg, self.session_start);
                self.push(idle);
                self.presence.disconnect();

                if self.cfg.keep_running_after_exit {
                    TickOutcome::Continue(self.idle_interval())
                } else {
                    TickOutcome::Finished
                }
            }
            (GameState::NoProcess, None) => {
                tracing::debug!("{} is not running. waiting...", self.cfg.process_name);
                TickOutcome::Continue(self.idle_interval())
            }
        }
    }

    /// Tick until the game exits (without keep-running) or `stop` is raised.
    pub fn run(&mut self) {
        tracing::info!(
            "Watching {} for {}",
            self.watcher.status_path().display(),
            self.cfg.process_name
        );

        loop {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            let next = match self.tick() {
                TickOutcome::Continue(next) => next,
                TickOutcome::Finished => break,
            };

            if !sleep_unless_stopped(next, &self.stop) {
                break;
            }
        }

        self.shutdown();
    }

    /// Close the open subtitle block, clear the activity and hang up.
    pub fn shutdown(&mut self) {
        self.note_song(None);
        self.presence.clear();
        self.presence.disconnect();
    }

    fn push(&mut self, payload: PresencePayload) {
        if !self.presence.set(&payload) {
            tracing::debug!("Presence not delivered; will retry next tick");
        }
        self.last_payload = Some(payload);
    }

    fn refresh_file_song(&mut self) {
        match self.watcher.poll() {
            Ok(StatusChange::Unchanged) => {}
            Ok(StatusChange::Changed(None)) => self.file_song = None,
            Ok(StatusChange::Changed(Some(status))) => {
                self.file_song = Some(self.enrich_status(status));
            }
            Err(e) => {
                tracing::warn!("Failed to read song status: {}", e);
                self.file_song = None;
            }
        }
    }

    fn lookup(&self, title: &str, artist: &str) -> Option<SongDetails> {
        match self.enricher.enrich(title, artist) {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!("Error querying SynthDB for song details: {}", e);
                None
            }
        }
    }

    fn enrich_status(&self, status: StatusRecord) -> EnrichedRecord {
        let details = self.lookup(&status.title, &status.artist);
        let cover_url = self.upload_cover(&status);

        EnrichedRecord::from_status(status)
            .with_details(details.as_ref())
            .with_cover_url(cover_url)
            .with_started_at(Some(unix_now()))
    }

    fn upload_cover(&self, status: &StatusRecord) -> Option<String> {
        if !self.cfg.upload_cover_images {
            return None;
        }
        let (Some(uploader), Some(path)) = (&self.uploader, &status.cover_image_path) else {
            return None;
        };

        match uploader.upload_file(path) {
            Ok(url) => {
                tracing::info!("Uploaded cover image: {}", url);
                Some(url)
            }
            Err(e) => {
                tracing::warn!("Cover upload failed: {}", e);
                None
            }
        }
    }

    /// Live socket state wins over the status file while it has a song.
    fn active_record(&mut self) -> Option<EnrichedRecord> {
        let live_record = self
            .live
            .as_ref()
            .and_then(|live| live.snapshot().to_record(unix_now()));

        let Some(record) = live_record else {
            return self.file_song.clone();
        };

        let key = (record.status.title.clone(), record.status.artist.clone());
        let cached = matches!(&self.live_details, Some((k, _)) if *k == key);
        if !cached {
            let details = self.lookup(&key.0, &key.1);
            self.live_details = Some((key, details));
        }

        let details = self.live_details.as_ref().and_then(|(_, d)| d.as_ref());
        let bpm = details.and_then(|d| d.bpm).filter(|b| *b > 0);
        let is_custom = details.map(|d| d.is_custom).unwrap_or(false);
        let duration_seconds = record
            .duration_seconds
            .or_else(|| details.and_then(|d| d.duration).filter(|s| *s > 0));

        Some(EnrichedRecord {
            bpm,
            duration_seconds,
            is_custom_content: is_custom,
            ..record
        })
    }

    /// Log and record song start/stop transitions.
    fn note_song(&mut self, record: Option<&EnrichedRecord>) {
        let label = record.map(|r| {
            format!(
                "{} by {} [{}]",
                r.status.title, r.status.artist, r.status.difficulty
            )
        });

        if label == self.last_song {
            return;
        }

        if let Some(previous) = self.last_song.take() {
            tracing::info!("Song ended: {}", previous);
            if let Some(subs) = self.subtitles.as_mut()
                && let Err(e) = subs.song_ended()
            {
                tracing::warn!("Failed to write subtitle block: {}", e);
            }
        }

        if let Some(current) = &label {
            tracing::info!("Now playing: {}", current);
            if let Some(subs) = self.subtitles.as_mut()
                && let Err(e) = subs.song_started(current)
            {
                tracing::warn!("Failed to write subtitle block: {}", e);
            }
        }

        self.last_song = label;
    }
}
