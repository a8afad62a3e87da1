//! Status Source Reader: watches the two-line status file written by the
//! SongStatus mod and turns it into a [`StatusRecord`].

use crate::errors::AppResult;
use crate::models::status::{StatusRecord, UNKNOWN};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const ARTIST_SEPARATOR: &str = " by ";
const MAPPER_SEPARATOR: &str = "(mapped by ";

/// Result of one watcher poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged,
    /// The file changed; `None` means it is now empty or gone.
    Changed(Option<StatusRecord>),
}

pub struct SongStatusWatcher {
    status_path: PathBuf,
    cover_path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl SongStatusWatcher {
    pub fn new(status_path: impl Into<PathBuf>, cover_path: impl Into<PathBuf>) -> Self {
        Self {
            status_path: status_path.into(),
            cover_path: cover_path.into(),
            last_modified: None,
        }
    }

    pub fn status_path(&self) -> &Path {
        &self.status_path
    }

    /// True once per distinct modification time of the status file.
    /// A missing file (or one whose mtime cannot be read) reports no change
    /// and keeps the stored timestamp.
    pub fn check_for_change(&mut self) -> bool {
        let modified = match fs::metadata(&self.status_path).and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => return false,
        };

        if self.last_modified == Some(modified) {
            return false;
        }

        self.last_modified = Some(modified);
        true
    }

    /// Forget the last seen timestamp so the next check reports a change.
    pub fn reset(&mut self) {
        self.last_modified = None;
    }

    /// Read and parse the status file.
    /// `Ok(None)` when the file is missing or blank; `Err` only on a read failure.
    pub fn parse(&self) -> AppResult<Option<StatusRecord>> {
        let content = match fs::read_to_string(&self.status_path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(mut record) = parse_status_text(&content) else {
            return Ok(None);
        };

        // Checked on every read: the mod rewrites the image with each song.
        if cover_image_present(&self.cover_path) {
            record.has_cover_image = true;
            record.cover_image_path = Some(self.cover_path.clone());
        }

        Ok(Some(record))
    }

    /// `check_for_change` followed by `parse` when something changed.
    pub fn poll(&mut self) -> AppResult<StatusChange> {
        if !self.check_for_change() {
            return Ok(StatusChange::Unchanged);
        }
        Ok(StatusChange::Changed(self.parse()?))
    }
}

/// Best-effort parse of the status text. `None` for blank content.
///
/// Line 1: `"{title} by {artist}"`, line 2: `"{difficulty} (mapped by {mapper})"`.
/// Anything that does not match falls back to whole-line values and `"Unknown"`.
pub fn parse_status_text(content: &str) -> Option<StatusRecord> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    let mut lines = content.lines();
    let first = lines.next().unwrap_or_default();
    let second = lines.next();

    let (title, artist) = match first.split_once(ARTIST_SEPARATOR) {
        Some((t, a)) => (t.trim().to_string(), a.trim().to_string()),
        None => (first.trim().to_string(), UNKNOWN.to_string()),
    };

    let (difficulty, mapper) = match second {
        Some(line) => match line.split_once(MAPPER_SEPARATOR) {
            Some((d, m)) => (
                d.trim().to_string(),
                m.trim().trim_end_matches(')').trim().to_string(),
            ),
            None => (line.trim().to_string(), UNKNOWN.to_string()),
        },
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    Some(StatusRecord {
        title,
        artist,
        difficulty,
        mapper,
        has_cover_image: false,
        cover_image_path: None,
    })
}

pub fn cover_image_present(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}
