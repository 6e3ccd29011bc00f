//! Typed error hierarchy for recipebook.
//!
//! One enum per subsystem:
//! - `ApiError`: backend transport, status and body failures
//! - `DraftError`: local draft persistence failures
//! - `UploadError`: image validation and upload failures
//! - `EntryError`: ingredient form failures
//! - `WizardError`: authoring flow failures (validation, submit, save)
//! - `SessionError`: login state failures

use std::path::PathBuf;

use thiserror::Error;

use crate::wizard::WizardStep;

/// How much of an unparseable response body is kept for diagnosis.
pub const BODY_EXCERPT_LEN: usize = 200;

/// Truncate a raw response body to [`BODY_EXCERPT_LEN`] characters.
pub fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let mut excerpt: String = trimmed.chars().take(BODY_EXCERPT_LEN).collect();
    excerpt.push('…');
    excerpt
}

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx status. `message` is the backend's `message` field when the
    /// body carried one.
    #[error("{}", .message.as_deref().unwrap_or("API error"))]
    Status { status: u16, message: Option<String> },

    /// 2xx with `"status": "error"` in the body.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Invalid response from server: {excerpt}")]
    Malformed { excerpt: String },

    #[error("Not logged in")]
    Unauthorized,
}

impl ApiError {
    /// Message shown to the user: the backend's own words when present.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Status { status, .. } => format!("API error: {}", status),
            other => other.to_string(),
        }
    }
}

/// Errors from the local draft store.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Failed to read local storage at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write local storage at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Local storage record '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Draft {identity} not found")]
    NotFound { identity: String },
}

/// Errors from validating or uploading an image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select an image file")]
    NotAnImage { content_type: String },

    #[error("Image size should be less than {limit_mib}MB")]
    TooLarge { size: u64, limit_mib: u64 },

    #[error("No image provided")]
    Missing,

    #[error("Failed to read image at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid upload: {0}")]
    Malformed(String),

    #[error("Failed to upload image: {0}")]
    Store(#[source] std::io::Error),

    #[error("Failed to upload image: {0}")]
    Rejected(String),

    #[error("Failed to upload image: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Errors from the ingredient add/edit forms.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Name and quantity are required")]
    MissingFields,

    #[error("Please select a valid ingredient first")]
    IngredientUnresolved,

    #[error("Nothing to add")]
    EmptyInput,

    #[error("No suggestion at position {0}")]
    NoSuchSuggestion(usize),

    #[error("Failed to add {kind}: {source}")]
    Create {
        kind: recipebook_common::CatalogKind,
        #[source]
        source: ApiError,
    },
}

/// Errors from the authoring flow.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Please enter a recipe name")]
    MissingName,

    #[error("Please add at least one ingredient")]
    NoIngredients,

    #[error("Please add at least one cooking step")]
    NoSteps,

    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("Cannot leave {from} yet: {reason}")]
    Blocked { from: WizardStep, reason: String },

    #[error("Failed to {action} recipe: {source}")]
    Submit {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Failed to save draft: {0}")]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Errors from loading, verifying or tearing down a login session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session expired, please log in again")]
    Expired,

    #[error(transparent)]
    Api(#[from] ApiError),
}
