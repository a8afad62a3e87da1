//! Read-only SQLite handle for the SynthDB metadata store.

use rusqlite::{Connection, OpenFlags, Result};
use std::path::Path;

/// File names of the store when `synth_db_path` points at its folder, in lookup order.
pub const SYNTH_DB_FILES: [&str; 2] = ["SynthDB.sqlite", "SynthDB"];

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the store read-only. The game owns the file; we never write to it.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Helper to execute a closure with a connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        func(&self.conn)
    }
}

/// Accept either the database file or the folder that contains it.
pub fn resolve_store_file(path: &Path) -> Option<std::path::PathBuf> {
    if path.is_dir() {
        return SYNTH_DB_FILES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file());
    }
    path.is_file().then(|| path.to_path_buf())
}
