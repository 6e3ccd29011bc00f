use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::naming::stored_file_name;
use super::validate::{is_image_type, validate_image};
use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, RecipebookConfig};
use crate::errors::UploadError;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Headroom above the image limit for multipart framing, so an oversized
/// image still reaches the handler and gets a JSON answer.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Configuration for the upload proxy.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Images go to `<static_dir>/uploads`.
    pub static_dir: PathBuf,
    pub max_bytes: u64,
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: PathBuf::from(".recipebook/public"),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &RecipebookConfig, permissive_cors: bool) -> Self {
        Self {
            port: config.port,
            static_dir: config.static_dir.clone(),
            max_bytes: config.max_upload_bytes,
            permissive_cors,
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}

pub struct UploadState {
    pub uploads_dir: PathBuf,
    pub max_bytes: u64,
}

/// Success body of `POST /api/upload-image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_path: String,
    pub success: bool,
}

/// Error body of the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadErrorBody {
    pub error: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UploadError::Missing => (StatusCode::BAD_REQUEST, "No image provided".to_string()),
            UploadError::NotAnImage { .. } => (
                StatusCode::BAD_REQUEST,
                "Invalid file type. Only images are allowed.".to_string(),
            ),
            UploadError::TooLarge { .. } | UploadError::Malformed(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(UploadErrorBody { error: message })).into_response()
    }
}

pub fn build_router(state: Arc<UploadState>) -> Router {
    let body_limit = usize::try_from(state.max_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_OVERHEAD);
    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .route("/api/upload-image", post(upload_image))
        .route("/health", get(health))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn multipart_error(state: &UploadState, e: MultipartError) -> UploadError {
    tracing::warn!(error = %e, "Multipart read error");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge {
            size: state.max_bytes.saturating_add(1),
            limit_mib: state.max_bytes.div_ceil(1024 * 1024).max(1),
        }
    } else {
        UploadError::Malformed(e.body_text())
    }
}

async fn upload_image(
    State(state): State<Arc<UploadState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_image_type(&content_type) {
            return Err(UploadError::NotAnImage { content_type });
        }
        let original = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(&state, e))?;
        validate_image(&content_type, data.len() as u64, state.max_bytes)?;

        let file_name = stored_file_name(original.as_deref(), &content_type);
        store(&state.uploads_dir, &file_name, &data).await?;

        let image_path = format!("/uploads/{}", file_name);
        tracing::info!(%image_path, bytes = data.len(), "Image stored");
        return Ok(Json(UploadResponse {
            image_path,
            success: true,
        }));
    }

    Err(UploadError::Missing)
}

async fn store(dir: &Path, file_name: &str, data: &[u8]) -> Result<(), UploadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(UploadError::Store)?;
    tokio::fs::write(dir.join(file_name), data)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, file_name, "Failed to write image");
            UploadError::Store(e)
        })
}

/// Start the upload proxy and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let uploads_dir = config.uploads_dir();
    std::fs::create_dir_all(&uploads_dir).with_context(|| {
        format!(
            "Failed to create uploads directory: {}",
            uploads_dir.display()
        )
    })?;

    let state = Arc::new(UploadState {
        uploads_dir,
        max_bytes: config.max_bytes,
    });

    let mut app = build_router(state);
    if config.permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "Upload proxy listening");
    println!("Image upload proxy running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    println!("\nShutting down...");
}
