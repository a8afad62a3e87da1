use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionLink {
    pub label: String,
    pub url: String,
}

/// Display fields handed to the presence transport. Built fresh on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresencePayload {
    pub details: String,
    pub state: String,
    pub large_image: String,
    pub large_text: String,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub start: Option<i64>, // unix seconds
    pub end: Option<i64>,   // unix seconds; set only for a known song length
    pub buttons: Vec<ActionLink>,
}

impl PresencePayload {
    /// Length of the progress window, when the payload has one.
    pub fn progress_len(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
