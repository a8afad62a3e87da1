use serde::Serialize;
use std::path::PathBuf;

pub const UNKNOWN: &str = "Unknown";

/// One parse of the status file written by the game mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub title: String,
    pub artist: String,
    pub difficulty: String,
    pub mapper: String,
    pub has_cover_image: bool,
    pub cover_image_path: Option<PathBuf>, // only set when has_cover_image
}

impl StatusRecord {
    /// `"{title} by {artist}"`, the line shown as presence details.
    pub fn headline(&self) -> String {
        format!("{} by {}", self.title, self.artist)
    }
}
