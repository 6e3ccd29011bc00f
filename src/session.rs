//! Login session persisted between CLI invocations.
//!
//! A `Session` is an explicit value: `load` restores the cookie and asks the
//! backend who we are, `logout` tears it down. Nothing about the session is
//! global; commands that need the backend receive the client from it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::{BackendClient, Credentials, Registration, UserInfo};
use crate::errors::{ApiError, SessionError};

/// On-disk form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    cookie: String,
    user: UserInfo,
}

pub struct Session {
    client: BackendClient,
    user: UserInfo,
    path: PathBuf,
}

impl Session {
    /// Log in and persist the session cookie to `path`.
    pub async fn login(
        client: BackendClient,
        credentials: &Credentials,
        path: &Path,
    ) -> Result<Self, SessionError> {
        let user = client.login(credentials).await?;
        let session = Self {
            client,
            user,
            path: path.to_path_buf(),
        };
        session.persist()?;
        Ok(session)
    }

    /// Create an account; the backend logs the new user in.
    pub async fn register(
        client: BackendClient,
        registration: &Registration,
        path: &Path,
    ) -> Result<Self, SessionError> {
        let user = client.register(registration).await?;
        let session = Self {
            client,
            user,
            path: path.to_path_buf(),
        };
        session.persist()?;
        Ok(session)
    }

    /// Restore a persisted session and verify it with the backend.
    ///
    /// Returns `Ok(None)` when there is no session file. A session the
    /// backend no longer accepts is removed and reported as `Expired`.
    pub async fn load(client: BackendClient, path: &Path) -> Result<Option<Self>, SessionError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        client.restore_cookies(&stored.cookie);
        match client.current_user().await {
            Ok(user) => Ok(Some(Self {
                client,
                user,
                path: path.to_path_buf(),
            })),
            Err(ApiError::Unauthorized | ApiError::Status { status: 401, .. }) => {
                tracing::info!(path = %path.display(), "Backend rejected stored session");
                remove_file(path)?;
                Err(SessionError::Expired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Session::load`] but a missing session is an error.
    pub async fn require(client: BackendClient, path: &Path) -> Result<Self, SessionError> {
        Self::load(client, path)
            .await?
            .ok_or(SessionError::Api(ApiError::Unauthorized))
    }

    /// Tell the backend and drop the persisted file. The file is removed
    /// even when the backend call fails.
    pub async fn logout(self) -> Result<(), SessionError> {
        let result = self.client.logout().await;
        remove_file(&self.path)?;
        result?;
        Ok(())
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    fn persist(&self) -> Result<(), SessionError> {
        let stored = StoredSession {
            cookie: self.client.cookie_header().unwrap_or_default(),
            user: self.user.clone(),
        };
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&stored).map_err(|source| {
            SessionError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}

fn remove_file(path: &Path) -> Result<(), SessionError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SessionError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::json;
    use tempfile::tempdir;

    async fn fake_auth() -> String {
        async fn login() -> impl IntoResponse {
            (
                [(header::SET_COOKIE, "session=s3cret; Path=/")],
                Json(json!({"status": "success", "user": {"id": "u-7", "email": "a@b.c"}})),
            )
        }
        async fn user(headers: HeaderMap) -> impl IntoResponse {
            let ok = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|c| c.contains("session=s3cret"));
            if ok {
                Json(json!({"id": "u-7", "email": "a@b.c"})).into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"status": "error", "message": "Not authenticated"})),
                )
                    .into_response()
            }
        }
        async fn logout() -> Json<serde_json::Value> {
            Json(json!({"status": "success", "message": "Logged out successfully"}))
        }

        let app = Router::new()
            .route("/auth/api/login", post(login))
            .route("/auth/api/logout", post(logout))
            .route("/auth/api/user", get(user));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&format!("{}/api", base), &format!("{}/auth/api", base)).unwrap()
    }

    fn creds() -> Credentials {
        Credentials {
            email: "a@b.c".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn test_load_without_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded = Session::load(client("http://127.0.0.1:9"), &dir.path().join("session.json"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_login_persist_then_load() {
        let base = fake_auth().await;
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::login(client(&base), &creds(), &path).await.unwrap();
        assert_eq!(session.user().id, "u-7");
        assert!(path.exists());

        let restored = Session::load(client(&base), &path).await.unwrap().unwrap();
        assert_eq!(restored.user().email, "a@b.c");

        restored.logout().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_rejected_session_is_removed() {
        let base = fake_auth().await;
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"cookie":"session=stale","user":{"id":"u-7","email":"a@b.c"}}"#,
        )
        .unwrap();

        let err = Session::load(client(&base), &path).await.err().unwrap();
        assert!(matches!(err, SessionError::Expired));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_session_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Session::load(client("http://127.0.0.1:9"), &path)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Corrupt { .. }));
    }
}
