use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::server::IMAGE_FIELD;
use super::validate::validate_image;
use crate::errors::{UploadError, body_excerpt};

/// An image picked by the user, held in memory until it is sent.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Where accepted images go. Returns the servable reference path.
#[async_trait]
pub trait ImageSink: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError>;
}

/// Posts images to the upload proxy as multipart field `image`.
pub struct HttpImageSink {
    http: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SinkReply {
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpImageSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ImageSink for HttpImageSink {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(UploadError::Transport)?;
        let form = reqwest::multipart::Form::new().part(IMAGE_FIELD, part);

        let resp = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(UploadError::Transport)?;

        let reply: SinkReply = serde_json::from_str(&body)
            .map_err(|_| UploadError::Rejected(format!("unexpected response: {}", body_excerpt(&body))))?;

        match (status.is_success(), reply.image_path, reply.error) {
            (true, Some(path), _) => Ok(path),
            (_, _, Some(error)) => Err(UploadError::Rejected(error)),
            _ => Err(UploadError::Rejected(format!("upload failed ({})", status))),
        }
    }
}

/// The image picker widget: validate, preview, upload, keep the reference.
///
/// A rejected or failed pick leaves the previous preview and reference in
/// place. [`ImageUploader::clear`] is the handle parents use to reset it.
pub struct ImageUploader {
    sink: Arc<dyn ImageSink>,
    max_bytes: u64,
    preview: Option<String>,
    reference: Option<String>,
    uploading: bool,
}

impl ImageUploader {
    pub fn new(sink: Arc<dyn ImageSink>, max_bytes: u64) -> Self {
        Self {
            sink,
            max_bytes,
            preview: None,
            reference: None,
            uploading: false,
        }
    }

    /// Start from an image that is already uploaded (edit mode).
    pub fn with_current(mut self, reference: Option<String>) -> Self {
        self.preview = reference.clone();
        self.reference = reference;
        self
    }

    /// What is currently shown: a local file name while uploading, then the
    /// reference path.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Validate and upload `file`, returning its reference path.
    pub async fn select(&mut self, file: ImageFile) -> Result<String, UploadError> {
        validate_image(&file.content_type, file.size(), self.max_bytes)?;

        let previous = self.preview.take();
        self.preview = Some(file.file_name.clone());
        self.uploading = true;
        tracing::debug!(file = %file.file_name, bytes = file.size(), "Uploading image");

        let result = self.sink.upload(&file).await;
        self.uploading = false;
        match result {
            Ok(path) => {
                tracing::info!(%path, "Image uploaded");
                self.preview = Some(path.clone());
                self.reference = Some(path.clone());
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image upload failed");
                self.preview = previous;
                Err(e)
            }
        }
    }

    /// Pick a file from disk. Type and size are checked from the path and
    /// metadata before the file is read.
    pub async fn select_path(&mut self, path: &Path) -> Result<String, UploadError> {
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let read_err = |source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = tokio::fs::metadata(path).await.map_err(read_err)?.len();
        validate_image(&content_type, size, self.max_bytes)?;

        let bytes = tokio::fs::read(path).await.map_err(read_err)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.select(ImageFile {
            file_name,
            content_type,
            bytes,
        })
        .await
    }

    pub fn clear(&mut self) {
        self.preview = None;
        self.reference = None;
    }
}
