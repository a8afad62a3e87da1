pub mod enrich;
pub mod events;
pub mod payload;
pub mod poll;
pub mod subtitles;
pub mod watcher;
