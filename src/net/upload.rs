//! Cover upload to an anonymous image host (uguu.se compatible).
//!
//! `POST` multipart with a single `files[]` part; the host answers
//! `{"files": [{"url": "..."}]}`.

use crate::errors::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Request};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

const FORM_FIELD: &str = "files[]";

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^data:image/(\w+);base64,(.*)$").expect("data URL pattern is valid")
});

#[derive(Clone)]
pub struct ImageUploader {
    http_client: Client,
    upload_url: String,
}

impl ImageUploader {
    pub fn new(upload_url: impl Into<String>) -> AppResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            upload_url: upload_url.into(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Upload an image file from disk and return its public URL.
    pub fn upload_file(&self, path: &Path) -> AppResult<String> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover.png".to_string());
        self.upload_bytes(bytes, &file_name)
    }

    /// Upload a `data:image/<ext>;base64,...` URL (album art sent by the game).
    pub fn upload_data_url(&self, data_url: &str) -> AppResult<String> {
        let (bytes, ext) = decode_data_url(data_url)?;
        self.upload_bytes(bytes, &format!("cover.{ext}"))
    }

    pub fn upload_bytes(&self, bytes: Vec<u8>, file_name: &str) -> AppResult<String> {
        let request = self.upload_request(bytes, file_name)?;
        let response = self.http_client.execute(request)?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(AppError::Upload(format!(
                "upload failed with status code {}",
                response.status().as_u16()
            )));
        }

        let json: Value = response
            .json()
            .map_err(|e| AppError::Upload(format!("response is not JSON: {e}")))?;
        tracing::debug!("Upload response: {}", json);

        extract_uploaded_url(&json)
            .ok_or_else(|| AppError::Upload(format!("unexpected response format: {json}")))
    }

    /// The multipart `POST` for one image, ready to execute.
    pub fn upload_request(&self, bytes: Vec<u8>, file_name: &str) -> AppResult<Request> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(&image_mime(file_name))?;
        let form = Form::new().part(FORM_FIELD, part);

        let request = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .build()?;
        Ok(request)
    }
}

/// `image/<ext>` from the file extension, png when there is none.
fn image_mime(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_else(|| "png".to_string());
    match ext.as_str() {
        "jpg" => "image/jpeg".to_string(),
        _ => format!("image/{ext}"),
    }
}

/// `files[0].url` of the host's answer.
pub fn extract_uploaded_url(json: &Value) -> Option<String> {
    json.get("files")?
        .get(0)?
        .get("url")?
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Split a base64 image data URL into raw bytes and the image subtype.
pub fn decode_data_url(data_url: &str) -> AppResult<(Vec<u8>, String)> {
    let caps = DATA_URL
        .captures(data_url.trim())
        .ok_or_else(|| AppError::InvalidImage("invalid base64 image format".into()))?;

    let ext = caps[1].to_ascii_lowercase();
    let payload: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::InvalidImage(e.to_string()))?;

    Ok((bytes, ext))
}
