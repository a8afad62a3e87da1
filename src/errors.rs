//! Unified application error type.
//! Every component boundary (watcher, db, presence, net, config) returns
//! AppError so the poll loop can decide centrally what is fatal.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Metadata store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    // ---------------------------
    // Presence transport
    // ---------------------------
    #[error("Presence transport error: {0}")]
    Transport(String),

    #[error("Presence transport is not connected")]
    NotConnected,

    // ---------------------------
    // Network
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration to {0}")]
    ConfigSave(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(code) => AppError::Http(format!("status {}", code.as_u16())),
            None => AppError::Http(err.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
