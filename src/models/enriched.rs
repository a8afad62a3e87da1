use super::song::SongDetails;
use super::status::StatusRecord;
use serde::Serialize;

/// StatusRecord plus whatever the metadata store and the image host could add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub status: StatusRecord,
    pub bpm: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub is_custom_content: bool,
    pub cover_url: Option<String>,
    pub started_at: Option<i64>, // unix seconds
}

impl EnrichedRecord {
    /// Record carrying only the status fields.
    pub fn from_status(status: StatusRecord) -> Self {
        Self {
            status,
            bpm: None,
            duration_seconds: None,
            is_custom_content: false,
            cover_url: None,
            started_at: None,
        }
    }

    /// Merge an optional store row. A missing row leaves the status fields alone.
    pub fn with_details(mut self, details: Option<&SongDetails>) -> Self {
        if let Some(d) = details {
            self.bpm = d.bpm.filter(|b| *b > 0);
            self.duration_seconds = d.duration.filter(|s| *s > 0);
            self.is_custom_content = d.is_custom;
        }
        self
    }

    pub fn with_cover_url(mut self, url: Option<String>) -> Self {
        self.cover_url = url;
        self
    }

    pub fn with_duration(mut self, duration_seconds: Option<i64>) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_started_at(mut self, started_at: Option<i64>) -> Self {
        self.started_at = started_at;
        self
    }
}
