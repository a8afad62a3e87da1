//! Metadata Enricher: looks a parsed (title, artist) up in SynthDB.

use crate::db::{DbPool, find_song, resolve_store_file};
use crate::errors::AppResult;
use crate::models::song::SongDetails;
use std::path::PathBuf;

pub struct MetadataEnricher {
    store_path: Option<PathBuf>,
}

impl MetadataEnricher {
    pub fn new(store_path: Option<PathBuf>) -> Self {
        Self { store_path }
    }

    /// Enricher without a store; every lookup is absent.
    pub fn disabled() -> Self {
        Self { store_path: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store_path.is_some()
    }

    /// `Ok(None)` when no store is configured, the store file is missing,
    /// or no row matches. The store is opened read-only for this query only.
    pub fn enrich(&self, title: &str, artist: &str) -> AppResult<Option<SongDetails>> {
        let Some(path) = &self.store_path else {
            return Ok(None);
        };

        let Some(file) = resolve_store_file(path) else {
            tracing::debug!(
                "SynthDB not found at {} (looked for SynthDB.sqlite or SynthDB)",
                path.display()
            );
            return Ok(None);
        };

        let pool = DbPool::open_read_only(&file)?;
        let details = find_song(&pool, title, artist)?;

        if details.is_none() {
            tracing::debug!("'{}' by '{}' not found in SynthDB", title, artist);
        }

        Ok(details)
    }
}
