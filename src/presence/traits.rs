use crate::errors::AppResult;
use crate::models::payload::PresencePayload;

/// A local-IPC rich presence backend (Discord, or a test double).
pub trait PresenceTransport: Send {
    /// Returns the name of this transport (for logging)
    fn name(&self) -> &'static str;

    fn connect(&mut self) -> AppResult<()>;

    /// Replace the current activity with `payload`
    fn update(&mut self, payload: &PresencePayload) -> AppResult<()>;

    /// Remove the activity but keep the connection
    fn clear(&mut self) -> AppResult<()>;

    /// Drop the connection; must be safe to call when not connected
    fn close(&mut self);
}
