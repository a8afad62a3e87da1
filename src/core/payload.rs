//! Presence Payload Builder. Pure: the output depends only on the arguments.

use crate::config::Config;
use crate::models::enriched::EnrichedRecord;
use crate::models::payload::{ActionLink, PresencePayload};

pub const STATE_DELIMITER: &str = " | ";

pub fn build(
    record: Option<&EnrichedRecord>,
    cfg: &Config,
    session_start: i64,
) -> PresencePayload {
    let buttons = action_links(cfg);

    let Some(record) = record else {
        return PresencePayload {
            details: cfg.idle_details.clone(),
            state: cfg.idle_state.clone(),
            large_image: cfg.large_image.clone(),
            large_text: cfg.large_image_text.clone(),
            small_image: None,
            small_text: None,
            start: Some(session_start),
            end: None,
            buttons,
        };
    };

    let headline = record.status.headline();

    let (large_image, large_text, small_image, small_text) = match &record.cover_url {
        Some(url) => (
            url.clone(),
            headline.clone(),
            Some(cfg.small_image.clone()),
            Some(cfg.large_image_text.clone()),
        ),
        None => (
            cfg.large_image.clone(),
            cfg.large_image_text.clone(),
            None,
            None,
        ),
    };

    let (start, end) = match (record.started_at, record.duration_seconds) {
        (Some(started), Some(duration)) => (Some(started), Some(started + duration)),
        _ => (Some(session_start), None),
    };

    PresencePayload {
        details: headline,
        state: state_line(record),
        large_image,
        large_text,
        small_image,
        small_text,
        start,
        end,
        buttons,
    }
}

/// `difficulty | {bpm} BPM | Mapped by {mapper}`; the BPM segment is dropped when unknown.
pub fn state_line(record: &EnrichedRecord) -> String {
    let mut parts = vec![record.status.difficulty.clone()];
    if let Some(bpm) = record.bpm {
        parts.push(format!("{bpm} BPM"));
    }
    parts.push(format!("Mapped by {}", record.status.mapper));
    parts.join(STATE_DELIMITER)
}

fn action_links(cfg: &Config) -> Vec<ActionLink> {
    if !cfg.show_button {
        return Vec::new();
    }
    vec![ActionLink {
        label: cfg.button_label.clone(),
        url: cfg.button_url.clone(),
    }]
}
