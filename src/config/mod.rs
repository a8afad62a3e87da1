use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

const DEFAULT_GAME_DIR: &str =
    "C:\\Program Files (x86)\\Steam\\steamapps\\common\\SynthRiders\\SynthRidersUC";

/// Flat key/value configuration, stored as `config.json`.
/// Every key has a default so partial files written by older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discord_application_id: i64,
    pub process_name: String,

    pub song_status_path: String,
    pub cover_image_path: String,
    pub synth_db_path: Option<String>,

    pub idle_details: String,
    pub idle_state: String,
    pub large_image: String,
    pub large_image_text: String,
    pub small_image: String,

    pub show_button: bool,
    pub button_label: String,
    pub button_url: String,

    pub keep_running_after_exit: bool,

    pub show_update_notice: bool,
    pub version_check_url: String,
    pub releases_url: String,

    pub upload_cover_images: bool,
    pub image_upload_url: String,

    pub websocket_enabled: bool,
    pub websocket_host: String,
    pub websocket_port: u16,

    pub write_subtitles: bool,

    pub running_poll_secs: u64,
    pub idle_poll_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_application_id: 1124356298578870333,
            process_name: "SynthRiders.exe".to_string(),
            song_status_path: format!("{DEFAULT_GAME_DIR}\\SongStatusOutput.txt"),
            cover_image_path: format!("{DEFAULT_GAME_DIR}\\SongStatusImage.png"),
            synth_db_path: None,
            idle_details: "looking for a song to play".to_string(),
            idle_state: "Idle".to_string(),
            large_image: "game_synthriders_logo".to_string(),
            large_image_text: "Synth Riders".to_string(),
            small_image: "game_synthriders_logo".to_string(),
            show_button: true,
            button_label: "Synth Riders".to_string(),
            button_url: "https://synthridersvr.com".to_string(),
            keep_running_after_exit: false,
            show_update_notice: true,
            version_check_url: "https://raw.githubusercontent.com/6uhrmittag/Synth-Riders-DiscordRPC/refs/heads/master/settings/appinfo.ini".to_string(),
            releases_url: "https://github.com/6uhrmittag/Synth-Riders-DiscordRPC/releases"
                .to_string(),
            upload_cover_images: true,
            image_upload_url: "https://uguu.se/upload".to_string(),
            websocket_enabled: false,
            websocket_host: "localhost".to_string(),
            websocket_port: 9000,
            write_subtitles: false,
            running_poll_secs: 5,
            idle_poll_secs: 15,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("synthriders-rpc")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".synthriders-rpc")
        }
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Directory holding rolling log files and subtitle sidecars,
    /// next to whichever config file is in use.
    pub fn log_dir(config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join("logs"),
            _ => Self::config_dir().join("logs"),
        }
    }

    /// Resolve the config path: `--config` override first, default location otherwise.
    pub fn resolve_path(custom: Option<&str>) -> PathBuf {
        match custom {
            Some(p) => expand_tilde(p),
            None => Self::config_file(),
        }
    }

    /// Load configuration from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).map_err(|_| AppError::ConfigLoad(path.display().to_string()))?;
        let cfg: Config = serde_json::from_str(&content)?;
        Ok(cfg)
    }

    /// Write configuration as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|_| AppError::ConfigSave(path.display().to_string()))
    }

    pub fn song_status_file(&self) -> PathBuf {
        expand_tilde(&self.song_status_path)
    }

    pub fn cover_image_file(&self) -> PathBuf {
        expand_tilde(&self.cover_image_path)
    }

    pub fn synth_db_file(&self) -> Option<PathBuf> {
        self.synth_db_path.as_deref().map(expand_tilde)
    }

    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}", self.websocket_host, self.websocket_port)
    }
}
