mod client;
mod discord;
mod traits;

pub use client::PresenceClient;
pub use discord::DiscordTransport;
pub use traits::PresenceTransport;
