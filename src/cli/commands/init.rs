use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - `config.json` with every default filled in
///  - the log directory next to it
pub fn handle(cmd: &Commands, cfg_path: &Path) -> AppResult<()> {
    let Commands::Init { force } = cmd else {
        return Ok(());
    };

    info("Initializing synthriders-rpc…");

    if cfg_path.exists() && !force {
        warning(format!(
            "Config file already exists: {} (use --force to overwrite)",
            cfg_path.display()
        ));
    } else {
        Config::default().save(cfg_path)?;
        success(format!("Config file : {}", cfg_path.display()));
    }

    let log_dir = Config::log_dir(cfg_path);
    fs::create_dir_all(&log_dir)?;
    success(format!("Log folder  : {}", log_dir.display()));

    info("Set `synth_db_path` to your SynthDB file to show BPM and song length.");
    Ok(())
}
