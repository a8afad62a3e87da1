//! Connection lifecycle around a [`PresenceTransport`].
//!
//! Transport failures never propagate: they are logged and flip the
//! `connected` flag, and the next call reconnects.

use super::traits::PresenceTransport;
use crate::models::payload::PresencePayload;

pub struct PresenceClient {
    transport: Box<dyn PresenceTransport>,
    connected: bool,
}

impl PresenceClient {
    pub fn new(transport: Box<dyn PresenceTransport>) -> Self {
        Self {
            transport,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn connect(&mut self) -> bool {
        match self.transport.connect() {
            Ok(()) => {
                tracing::info!("Connected to {}", self.transport.name());
                self.connected = true;
            }
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", self.transport.name(), e);
                self.connected = false;
            }
        }
        self.connected
    }

    /// Push `payload`, connecting first when needed.
    pub fn set(&mut self, payload: &PresencePayload) -> bool {
        if !self.connected && !self.connect() {
            return false;
        }

        match self.transport.update(payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to update {} presence: {}", self.transport.name(), e);
                self.connected = false;
                false
            }
        }
    }

    /// Clear the activity. A disconnected client has nothing to clear.
    pub fn clear(&mut self) -> bool {
        if !self.connected {
            return false;
        }

        match self.transport.clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to clear {} presence: {}", self.transport.name(), e);
                self.connected = false;
                false
            }
        }
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            self.transport.close();
            self.connected = false;
            tracing::info!("Disconnected from {}", self.transport.name());
        }
    }
}
