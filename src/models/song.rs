use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

/// A row of the SynthDB `TracksCache` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongDetails {
    pub id: i64,
    pub file_name: Option<String>, // ⇔ TracksCache.file_name
    pub title: String,             // ⇔ TracksCache.song_name
    pub author: String,            // ⇔ TracksCache.author
    pub mapper: Option<String>,    // ⇔ TracksCache.beatmapper
    pub bpm: Option<i64>,
    pub duration: Option<i64>, // seconds
    pub date_created: Option<i64>,
    pub is_custom: bool, // derived from file_name
}

impl SongDetails {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let file_name: Option<String> = row.get("file_name")?;
        let is_custom = file_name
            .as_deref()
            .map(is_custom_map_file)
            .unwrap_or(false);

        Ok(Self {
            id: row.get("id")?,
            title: row.get::<_, Option<String>>("song_name")?.unwrap_or_default(),
            author: row.get::<_, Option<String>>("author")?.unwrap_or_default(),
            mapper: row.get("beatmapper")?,
            bpm: whole_number(row.get("bpm")?),
            duration: whole_number(row.get("duration")?),
            date_created: whole_number(row.get("date_created")?),
            file_name,
            is_custom,
        })
    }
}

/// Numeric columns are loosely typed in SynthDB: REAL values are rounded,
/// text and blobs count as unknown.
fn whole_number(value: Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(n),
        Value::Real(f) if f.is_finite() => Some(f.round() as i64),
        _ => None,
    }
}

/// Custom maps ship as `.synth` archives; official tracks do not.
pub fn is_custom_map_file(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".synth")
}
