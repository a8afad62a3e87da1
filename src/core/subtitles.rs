//! SubRip (.srt) sidecar: one numbered block per song, timed from session start.
//! Handy as a subtitle track over a recording of the session.

use crate::errors::AppResult;
use crate::utils::time::format_srt_timestamp;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct SubtitleWriter {
    path: PathBuf,
    session_start: Instant,
    index: usize,
    open: Option<(Duration, String)>,
}

impl SubtitleWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session_start: Instant::now(),
            index: 0,
            open: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn song_started(&mut self, label: &str) -> AppResult<()> {
        let elapsed = self.session_start.elapsed();
        self.song_started_at(label, elapsed)
    }

    pub fn song_ended(&mut self) -> AppResult<()> {
        let elapsed = self.session_start.elapsed();
        self.song_ended_at(elapsed)
    }

    /// Open a block at `elapsed`; a block still open is closed at the same instant.
    pub fn song_started_at(&mut self, label: &str, elapsed: Duration) -> AppResult<()> {
        self.song_ended_at(elapsed)?;
        self.open = Some((elapsed, label.to_string()));
        Ok(())
    }

    /// Close the open block (if any) at `elapsed` and append it to the file.
    pub fn song_ended_at(&mut self, elapsed: Duration) -> AppResult<()> {
        let Some((start, label)) = self.open.take() else {
            return Ok(());
        };

        self.index += 1;
        let block = format!(
            "{}\n{} --> {}\n{}\n\n",
            self.index,
            format_srt_timestamp(start),
            format_srt_timestamp(elapsed.max(start)),
            label
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())?;
        Ok(())
    }
}
