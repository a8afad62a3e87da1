//! Discord Rich Presence transport using discord-sdk

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use discord_sdk::{
    Discord, Subscriptions,
    activity::{ActivityBuilder, Assets, Button},
    wheel::{UserState, Wheel},
};
use tokio::runtime::Runtime;

use super::traits::PresenceTransport;
use crate::errors::{AppError, AppResult};
use crate::models::payload::PresencePayload;

/// Timeout for waiting for Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single activity update/clear
const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking facade over the async discord-sdk client.
/// The poll loop is synchronous, so every call is driven on a private runtime.
pub struct DiscordTransport {
    app_id: i64,
    runtime: Option<Runtime>,
    discord: Option<Discord>,
    _wheel: Option<Wheel>,
}

impl DiscordTransport {
    pub fn new(app_id: i64) -> Self {
        Self {
            app_id,
            runtime: None,
            discord: None,
            _wheel: None,
        }
    }

    fn ensure_runtime(&mut self) -> AppResult<&Runtime> {
        if self.runtime.is_none() {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("discord-ipc")
                .enable_all()
                .build()?;
            self.runtime = Some(runtime);
        }

        self.runtime
            .as_ref()
            .ok_or_else(|| AppError::Other("tokio runtime unavailable".into()))
    }

    fn activity(payload: &PresencePayload) -> ActivityBuilder {
        let mut assets = Assets::default().large(
            payload.large_image.as_str(),
            Some(payload.large_text.as_str()),
        );
        if let Some(small) = &payload.small_image {
            assets = assets.small(small.as_str(), payload.small_text.as_deref());
        }

        let mut activity = ActivityBuilder::new()
            .details(payload.details.as_str())
            .state(payload.state.as_str())
            .assets(assets);

        if let Some(start) = payload.start {
            activity = activity.start_timestamp(unix_to_system_time(start));
        }
        if let Some(end) = payload.end {
            activity = activity.end_timestamp(unix_to_system_time(end));
        }

        for link in &payload.buttons {
            activity = activity.button(Button {
                label: link.label.clone(),
                url: link.url.clone(),
            });
        }

        activity
    }
}

impl PresenceTransport for DiscordTransport {
    fn name(&self) -> &'static str {
        "Discord"
    }

    fn connect(&mut self) -> AppResult<()> {
        // Drop any half-open client before dialing again.
        self.close();

        let app_id = self.app_id;
        let runtime = self.ensure_runtime()?;

        let (discord, wheel, username) = runtime.block_on(async move {
            let (wheel, handler) = Wheel::new(Box::new(|err| {
                tracing::warn!("Discord error: {:?}", err);
            }));

            let mut user_spoke = wheel.user();

            let discord = Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler))
                .map_err(|e| AppError::Transport(format!("Discord not available: {e:?}")))?;

            tracing::debug!("Discord connecting...");

            let handshake = tokio::time::timeout(HANDSHAKE_TIMEOUT, user_spoke.0.changed()).await;

            let user = match handshake {
                Ok(Ok(())) => match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.username.clone()),
                    UserState::Disconnected(err) => Err(AppError::Transport(format!(
                        "Discord disconnected: {err:?}"
                    ))),
                },
                Ok(Err(_)) => Err(AppError::Transport("Discord connection closed".into())),
                Err(_) => Err(AppError::Transport("Discord handshake timed out".into())),
            };

            match user {
                Ok(username) => Ok((discord, wheel, username)),
                Err(e) => {
                    discord.disconnect().await;
                    Err(e)
                }
            }
        })?;

        tracing::info!("Discord Rich Presence connected as {}", username);

        self.discord = Some(discord);
        self._wheel = Some(wheel);
        Ok(())
    }

    fn update(&mut self, payload: &PresencePayload) -> AppResult<()> {
        let (Some(runtime), Some(discord)) = (self.runtime.as_ref(), self.discord.as_ref()) else {
            return Err(AppError::NotConnected);
        };

        let activity = Self::activity(payload);

        runtime
            .block_on(tokio::time::timeout(
                CALL_TIMEOUT,
                discord.update_activity(activity),
            ))
            .map_err(|_| AppError::Transport("activity update timed out".into()))?
            .map_err(|e| AppError::Transport(format!("{e:?}")))?;

        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        let (Some(runtime), Some(discord)) = (self.runtime.as_ref(), self.discord.as_ref()) else {
            return Err(AppError::NotConnected);
        };

        runtime
            .block_on(tokio::time::timeout(CALL_TIMEOUT, discord.clear_activity()))
            .map_err(|_| AppError::Transport("activity clear timed out".into()))?
            .map_err(|e| AppError::Transport(format!("{e:?}")))?;

        Ok(())
    }

    fn close(&mut self) {
        if let (Some(runtime), Some(discord)) = (self.runtime.as_ref(), self.discord.take()) {
            runtime.block_on(discord.disconnect());
            tracing::debug!("Discord Rich Presence disconnected");
        }
        self._wheel = None;
    }
}

impl Drop for DiscordTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn unix_to_system_time(secs: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}
