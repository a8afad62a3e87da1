//! Background listener for the game's event websocket.

use crate::core::events::{GameEvent, SharedSongState};
use crate::net::upload::ImageUploader;
use crate::utils::time::sleep_unless_stopped;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tungstenite::Message;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Decode and apply one text frame; upload album art outside the state lock.
pub fn handle_message(state: &SharedSongState, uploader: Option<&ImageUploader>, text: &str) {
    let event = match GameEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring websocket message: {}", e);
            return;
        }
    };

    if let GameEvent::SongStart(data) = &event {
        tracing::info!("Live song: {} by {} [{}]", data.song, data.author, data.difficulty);
    }

    let Some(art) = state.apply(&event) else {
        return;
    };
    let Some(uploader) = uploader else {
        return;
    };

    match uploader.upload_data_url(&art.data_url) {
        Ok(url) => {
            if !state.set_album_url(art.sequence, url) {
                tracing::debug!("Album art arrived after the song changed; dropped");
            }
        }
        Err(e) => tracing::warn!("Album art upload failed: {}", e),
    }
}

/// Spawn the listener thread. It reconnects every few seconds until `stop` is set;
/// nobody joins it, process exit ends it.
pub fn spawn_listener(
    url: String,
    state: Arc<SharedSongState>,
    uploader: Option<ImageUploader>,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("song-events".into())
        .spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                match tungstenite::connect(url.as_str()) {
                    Ok((mut socket, _)) => {
                        tracing::info!("Connected to Synth Riders websocket at {}", url);
                        state.set_connected(true);

                        while !stop.load(Ordering::SeqCst) {
                            match socket.read() {
                                Ok(Message::Text(text)) => {
                                    handle_message(&state, uploader.as_ref(), &text)
                                }
                                Ok(Message::Close(_)) => break,
                                Ok(_) => {}
                                Err(e) => {
                                    tracing::debug!("Websocket read failed: {}", e);
                                    break;
                                }
                            }
                        }

                        state.set_connected(false);
                        tracing::info!("Websocket connection closed");
                    }
                    Err(e) => tracing::debug!("Websocket not reachable at {}: {}", url, e),
                }

                if !sleep_unless_stopped(RECONNECT_DELAY, &stop) {
                    break;
                }
            }
        })
}
