use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::song::SongDetails;
use rusqlite::{OptionalExtension, params};

/// Find the track whose `song_name` and `author` contain `title` and `artist`.
///
/// Matching is a case-sensitive substring test (`instr`), so `%` and `_` in
/// titles are literal. Several hits resolve to the most recently created row.
pub fn find_song(pool: &DbPool, title: &str, artist: &str) -> AppResult<Option<SongDetails>> {
    let row = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(
            "SELECT id, file_name, song_name, author, beatmapper, bpm, duration, date_created
             FROM TracksCache
             WHERE instr(song_name, ?1) > 0 AND instr(author, ?2) > 0
             ORDER BY date_created DESC, id DESC
             LIMIT 1",
        )?;

        stmt.query_row(params![title, artist], SongDetails::from_row)
            .optional()
    })?;

    Ok(row)
}

/// Number of tracks in the store, for `lookup` diagnostics.
pub fn count_songs(pool: &DbPool) -> AppResult<i64> {
    let n = pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM TracksCache", [], |row| row.get(0))
    })?;
    Ok(n)
}
