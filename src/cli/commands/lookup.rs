use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::{DbPool, count_songs, find_song, resolve_store_file};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{field, header, song, warning};
use crate::utils::time::format_mm_ss;
use chrono::{DateTime, Utc};

/// Handle the `lookup` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Lookup { title, artist } = cmd else {
        return Ok(());
    };

    let Some(configured) = cfg.synth_db_file() else {
        return Err(AppError::Config(
            "synth_db_path is not set; add it with `config --edit`".into(),
        ));
    };

    let file = resolve_store_file(&configured).ok_or_else(|| {
        AppError::Config(format!("SynthDB not found at {}", configured.display()))
    })?;

    let pool = DbPool::open_read_only(&file)?;
    header(format!(
        "SynthDB: {} ({} songs)",
        file.display(),
        count_songs(&pool)?
    ));

    let Some(details) = find_song(&pool, title, artist)? else {
        warning(format!("No match for '{}' by '{}'", title, artist));
        return Ok(());
    };

    song(format!("{} by {}", details.title, details.author));
    field("Id", details.id);
    field("File", details.file_name.as_deref().unwrap_or("-"));
    field("Mapper", details.mapper.as_deref().unwrap_or("-"));
    field(
        "BPM",
        details
            .bpm
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".into()),
    );
    field(
        "Length",
        details
            .duration
            .map(|d| format_mm_ss(d as f64))
            .unwrap_or_else(|| "-".into()),
    );
    field("Custom", if details.is_custom { "yes" } else { "no" });
    field(
        "Added",
        details
            .date_created
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into()),
    );

    Ok(())
}
