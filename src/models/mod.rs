pub mod enriched;
pub mod payload;
pub mod song;
pub mod status;

pub use enriched::EnrichedRecord;
pub use payload::{ActionLink, PresencePayload};
pub use song::SongDetails;
pub use status::StatusRecord;
