//! Update check against the published `appinfo.ini`.

use crate::errors::{AppError, AppResult};
use std::time::Duration;

pub fn local_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Read `AppVersion` from the `[PROFILE]` section of an INI document.
pub fn parse_app_version(ini: &str) -> Option<String> {
    let mut in_profile = false;

    for line in ini.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_profile = line[1..line.len() - 1].trim().eq_ignore_ascii_case("PROFILE");
            continue;
        }
        if !in_profile {
            continue;
        }
        if let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':'))
            && key.trim().eq_ignore_ascii_case("AppVersion")
        {
            let value = value.trim();
            return (!value.is_empty()).then(|| value.to_string());
        }
    }

    None
}

fn numeric_parts(version: &str) -> Option<Vec<u64>> {
    version
        .trim()
        .trim_start_matches(['v', 'V'])
        .split('.')
        .map(|p| p.parse::<u64>().ok())
        .collect()
}

/// True when `remote` is newer than `local`. Versions that are not dotted
/// numbers fall back to a plain inequality check.
pub fn is_update_available(local: &str, remote: &str) -> bool {
    match (numeric_parts(local), numeric_parts(remote)) {
        (Some(mut l), Some(mut r)) => {
            let len = l.len().max(r.len());
            l.resize(len, 0);
            r.resize(len, 0);
            r > l
        }
        _ => local.trim() != remote.trim(),
    }
}

pub fn fetch_remote_version(url: &str) -> AppResult<String> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(5))
        .build()?;

    let body = client.get(url).send()?.error_for_status()?.text()?;

    parse_app_version(&body)
        .ok_or_else(|| AppError::Http(format!("no AppVersion found at {url}")))
}
