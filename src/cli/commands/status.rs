use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::enrich::MetadataEnricher;
use crate::core::payload;
use crate::core::watcher::SongStatusWatcher;
use crate::errors::AppResult;
use crate::models::enriched::EnrichedRecord;
use crate::models::payload::PresencePayload;
use crate::ui::messages::{field, header, info, song, warning};
use crate::utils::process::{ProcessProbe, SysinfoProbe};
use crate::utils::time::{format_mm_ss, unix_now};
use serde_json::json;

/// Handle the `status` command: one read of the status file, no Discord involved.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { json } = cmd else {
        return Ok(());
    };

    let now = unix_now();
    let watcher = SongStatusWatcher::new(cfg.song_status_file(), cfg.cover_image_file());
    let enricher = MetadataEnricher::new(cfg.synth_db_file());

    let parsed = match watcher.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            notice(*json, format!("Failed to read song status: {}", e));
            None
        }
    };

    let record = match parsed {
        Some(status) => {
            let details = match enricher.enrich(&status.title, &status.artist) {
                Ok(d) => d,
                Err(e) => {
                    notice(*json, format!("SynthDB lookup failed: {}", e));
                    None
                }
            };
            Some(
                EnrichedRecord::from_status(status)
                    .with_details(details.as_ref())
                    .with_started_at(Some(now)),
            )
        }
        None => None,
    };

    let presence = payload::build(record.as_ref(), cfg, now);
    let game_running = SysinfoProbe::new(cfg.process_name.clone()).is_running();

    if *json {
        let out = json!({
            "game_running": game_running,
            "record": record,
            "payload": presence,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    header("Song status");
    field(
        "Game",
        if game_running {
            format!("{} is running", cfg.process_name)
        } else {
            format!("{} is not running", cfg.process_name)
        },
    );
    field("Status file", watcher.status_path().display());

    match &record {
        Some(r) => print_record(r),
        None => info("No song is playing"),
    }

    println!();
    header("Presence payload");
    print_payload(&presence);

    Ok(())
}

/// Warnings go to stderr in `--json` mode so stdout stays parseable.
fn notice(json: bool, msg: String) {
    if json {
        eprintln!("Warning: {}", msg);
    } else {
        warning(msg);
    }
}

fn print_record(r: &EnrichedRecord) {
    song(r.status.headline());
    field("Difficulty", &r.status.difficulty);
    field("Mapper", &r.status.mapper);
    field(
        "BPM",
        r.bpm.map(|b| b.to_string()).unwrap_or_else(|| "-".into()),
    );
    field(
        "Length",
        r.duration_seconds
            .map(|d| format_mm_ss(d as f64))
            .unwrap_or_else(|| "-".into()),
    );
    field("Custom", if r.is_custom_content { "yes" } else { "no" });
    field(
        "Cover",
        r.status
            .cover_image_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".into()),
    );
}

fn print_payload(p: &PresencePayload) {
    field("Details", &p.details);
    field("State", &p.state);
    field("Large image", format!("{} ({})", p.large_image, p.large_text));
    if let Some(small) = &p.small_image {
        field("Small image", small);
    }
    if let Some(start) = p.start {
        field("Start", start);
    }
    if let Some(end) = p.end {
        field("End", end);
    }
    for button in &p.buttons {
        field("Button", format!("{} -> {}", button.label, button.url));
    }
}
