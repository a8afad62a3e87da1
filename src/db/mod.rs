pub mod pool;
pub mod queries;

pub use pool::{DbPool, resolve_store_file};
pub use queries::{count_songs, find_song};
