use crate::config::Config;
use crate::errors::AppResult;
use crate::net::version::{fetch_remote_version, is_update_available, local_version};
use crate::ui::messages::{info, success, warning};

/// Handle the `check-update` command
pub fn handle(cfg: &Config) -> AppResult<()> {
    let local = local_version();
    let remote = fetch_remote_version(&cfg.version_check_url)?;

    if is_update_available(local, &remote) {
        warning(format!(
            "New version available: {} (installed: {})",
            remote, local
        ));
        info(format!("Download it from {}", cfg.releases_url));
    } else {
        success(format!("synthriders-rpc {} is up to date", local));
    }

    Ok(())
}

/// Startup notice for `run`. Never fails: a broken check is only logged.
pub fn notify_if_outdated(cfg: &Config) {
    if !cfg.show_update_notice {
        return;
    }

    match fetch_remote_version(&cfg.version_check_url) {
        Ok(remote) if is_update_available(local_version(), &remote) => {
            tracing::warn!(
                "A new version is available: {} (installed: {}). {}",
                remote,
                local_version(),
                cfg.releases_url
            );
        }
        Ok(_) => tracing::debug!("No update available"),
        Err(e) => tracing::warn!("Update check failed: {}", e),
    }
}
