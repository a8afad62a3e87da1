//! Config merger: brings an existing user `config.json` up to date with the
//! current defaults without touching values the user already set.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use chrono::Local;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of comparing a user config with the defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// No config existed; a fresh default file was written.
    pub created: bool,
    /// Keys that were missing and got their default value.
    pub added: Vec<String>,
    /// Keys present in the user file that this version does not know.
    pub deprecated: Vec<String>,
    /// Backup written before the file was rewritten.
    pub backup: Option<PathBuf>,
}

impl MergeReport {
    pub fn changed(&self) -> bool {
        self.created || !self.added.is_empty()
    }
}

fn default_map() -> AppResult<Map<String, Value>> {
    match serde_json::to_value(Config::default())? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Other("default config is not a JSON object".into())),
    }
}

/// Add keys from `defaults` missing in `existing`; report keys `defaults` does not know.
/// Existing values are never overwritten.
pub fn merge_maps(existing: &mut Map<String, Value>, defaults: &Map<String, Value>) -> MergeReport {
    let mut report = MergeReport::default();

    for (key, value) in defaults {
        if !existing.contains_key(key) {
            existing.insert(key.clone(), value.clone());
            report.added.push(key.clone());
        }
    }

    report.deprecated = existing
        .keys()
        .filter(|k| !defaults.contains_key(*k))
        .cloned()
        .collect();

    report
}

fn read_user_map(path: &Path) -> AppResult<Map<String, Value>> {
    let content =
        fs::read_to_string(path).map_err(|_| AppError::ConfigLoad(path.display().to_string()))?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Config(format!(
            "{} does not contain a JSON object",
            path.display()
        ))),
    }
}

/// Copy `path` to `<path>.backup_<YYYYmmdd_HHMMSS>`.
pub fn backup_config(path: &Path) -> AppResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup_{timestamp}"));
    let backup = PathBuf::from(name);

    fs::copy(path, &backup)?;
    Ok(Some(backup))
}

/// Report what a migration would change, without writing anything.
pub fn check_config_file(path: &Path) -> AppResult<MergeReport> {
    if !path.exists() {
        return Ok(MergeReport {
            created: true,
            ..MergeReport::default()
        });
    }

    let mut existing = read_user_map(path)?;
    Ok(merge_maps(&mut existing, &default_map()?))
}

/// Merge the defaults into the config at `path` (fresh install writes the defaults).
/// The previous file is backed up before it is rewritten.
pub fn migrate_config_file(path: &Path) -> AppResult<MergeReport> {
    if !path.exists() {
        Config::default().save(path)?;
        return Ok(MergeReport {
            created: true,
            ..MergeReport::default()
        });
    }

    let mut existing = read_user_map(path)?;
    let mut report = merge_maps(&mut existing, &default_map()?);

    if report.added.is_empty() {
        return Ok(report);
    }

    report.backup = backup_config(path)?;

    let json = serde_json::to_string_pretty(&Value::Object(existing))?;
    fs::write(path, json).map_err(|_| AppError::ConfigSave(path.display().to_string()))?;

    Ok(report)
}

/// Print a merge report with the usual CLI markers.
pub fn print_report(path: &Path, report: &MergeReport, applied: bool) {
    if report.created {
        if applied {
            success(format!("Created new config: {}", path.display()));
        } else {
            warning(format!("No config found at {}", path.display()));
        }
        return;
    }

    for key in &report.added {
        if applied {
            info(format!("Added new setting: {key}"));
        } else {
            warning(format!("Missing setting: {key}"));
        }
    }

    if !report.deprecated.is_empty() {
        warning(format!(
            "Found deprecated settings: {} (kept, but unused)",
            report.deprecated.join(", ")
        ));
    }

    if let Some(backup) = &report.backup {
        info(format!("Backup created: {}", backup.display()));
    }

    if report.added.is_empty() {
        success("Configuration is up to date");
    } else if applied {
        success(format!("Updated config: {}", path.display()));
    }
}
