use super::update::notify_if_outdated;
use crate::config::Config;
use crate::core::events::SharedSongState;
use crate::core::poll::PollLoop;
use crate::core::subtitles::SubtitleWriter;
use crate::errors::{AppError, AppResult};
use crate::logging::init_logging;
use crate::net::upload::ImageUploader;
use crate::net::websocket::spawn_listener;
use crate::presence::{DiscordTransport, PresenceClient};
use crate::utils::process::SysinfoProbe;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle the `run` command: the long-running presence service.
pub fn handle(cfg: &Config, cfg_path: &Path) -> AppResult<()> {
    let log_dir = Config::log_dir(cfg_path);
    let _guard = init_logging(&log_dir);

    tracing::info!("Using config {}", cfg_path.display());
    notify_if_outdated(cfg);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            tracing::info!("Received Ctrl+C, shutting down");
            stop.store(true, Ordering::SeqCst);
        })
        .map_err(|e| AppError::Other(format!("cannot install Ctrl+C handler: {e}")))?;
    }

    let uploader = cfg
        .upload_cover_images
        .then(|| ImageUploader::new(cfg.image_upload_url.clone()))
        .transpose()?;

    let presence = PresenceClient::new(Box::new(DiscordTransport::new(
        cfg.discord_application_id,
    )));
    let probe = Box::new(SysinfoProbe::new(cfg.process_name.clone()));

    let mut poll = PollLoop::new(cfg.clone(), presence, probe).with_stop_flag(Arc::clone(&stop));

    if let Some(uploader) = uploader.clone() {
        poll = poll.with_uploader(uploader);
    }

    if cfg.websocket_enabled {
        let live = Arc::new(SharedSongState::new());
        let _listener = spawn_listener(
            cfg.websocket_url(),
            Arc::clone(&live),
            uploader,
            Arc::clone(&stop),
        )?;
        poll = poll.with_live_state(live);
    }

    if cfg.write_subtitles {
        let file = log_dir.join(format!(
            "session_{}.srt",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        tracing::info!("Writing session subtitles to {}", file.display());
        poll = poll.with_subtitles(SubtitleWriter::new(file));
    }

    poll.run();

    tracing::info!("synthriders-rpc stopped");
    Ok(())
}
