use std::sync::Arc;

use async_trait::async_trait;
use recipebook_common::{CatalogId, RecipeDetail, RecipePayload, RecipeSummary, Suggestion};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::types::{
    Ack, AddedMember, AuthResponse, CreatedBrand, CreatedFamily, CreatedIngredient, Credentials,
    Family, FamilyMember, MemberInvite, NewBrand, NewFamily, NewIngredient, Registration,
    SubmitReceipt, UserInfo,
};
use super::{CatalogBackend, RecipeBackend};
use crate::errors::{ApiError, body_excerpt};

/// HTTP client for the recipe API and the auth API.
///
/// All requests share one cookie jar, so a login through the auth base is
/// seen by the recipe base.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    jar: Arc<Jar>,
    api_url: String,
    auth_url: String,
}

impl BackendClient {
    pub fn new(api_url: &str, auth_url: &str) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(concat!("recipebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            jar,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Seed the jar from a persisted `name=value; name2=value2` header.
    pub fn restore_cookies(&self, header: &str) {
        for base in [&self.api_url, &self.auth_url] {
            let Ok(url) = Url::parse(base) else {
                tracing::warn!(url = %base, "Skipping cookie restore for unparseable URL");
                continue;
            };
            for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                self.jar.add_cookie_str(&format!("{}; Path=/", pair), &url);
            }
        }
    }

    /// Cookies the backend has set so far, as a request header value.
    pub fn cookie_header(&self) -> Option<String> {
        let url = Url::parse(&self.auth_url).ok()?;
        let value = self.jar.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn auth(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::Transport)?;
        decode_response(status, &body)
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo, ApiError> {
        let response: AuthResponse = self
            .send(self.http.post(self.auth("/login")).json(credentials))
            .await?;
        tracing::info!(user = %response.user.email, "Logged in");
        Ok(response.user)
    }

    pub async fn register(&self, registration: &Registration) -> Result<UserInfo, ApiError> {
        let response: AuthResponse = self
            .send(self.http.post(self.auth("/register")).json(registration))
            .await?;
        tracing::info!(user = %response.user.email, "Registered");
        Ok(response.user)
    }

    pub async fn logout(&self) -> Result<Ack, ApiError> {
        self.send(self.http.post(self.auth("/logout"))).await
    }

    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        self.send(self.http.get(self.auth("/user"))).await
    }

    // Recipes

    pub async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, ApiError> {
        self.send(self.http.get(self.api("/user/recipes"))).await
    }

    pub async fn get_recipe(&self, recipe_id: &str) -> Result<RecipeDetail, ApiError> {
        self.send(self.http.get(self.api(&format!("/recipes/{}", recipe_id))))
            .await
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<Ack, ApiError> {
        self.send(self.http.delete(self.api(&format!("/recipes/{}", recipe_id))))
            .await
    }

    // Families

    pub async fn list_families(&self) -> Result<Vec<Family>, ApiError> {
        self.send(self.http.get(self.api("/families"))).await
    }

    pub async fn create_family(&self, name: &str) -> Result<Family, ApiError> {
        let created: CreatedFamily = self
            .send(self.http.post(self.api("/families")).json(&NewFamily { name }))
            .await?;
        Ok(created.family)
    }

    pub async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>, ApiError> {
        self.send(
            self.http
                .get(self.api(&format!("/families/{}/members", family_id))),
        )
        .await
    }

    pub async fn add_family_member(
        &self,
        family_id: &str,
        invite: &MemberInvite,
    ) -> Result<FamilyMember, ApiError> {
        let added: AddedMember = self
            .send(
                self.http
                    .post(self.api(&format!("/families/{}/members", family_id)))
                    .json(invite),
            )
            .await?;
        Ok(added.member)
    }

    pub async fn remove_family_member(
        &self,
        family_id: &str,
        member_id: &str,
    ) -> Result<Ack, ApiError> {
        self.send(self.http.delete(self.api(&format!(
            "/families/{}/members/{}",
            family_id, member_id
        ))))
        .await
    }
}

#[async_trait]
impl RecipeBackend for BackendClient {
    async fn create_recipe(&self, payload: &RecipePayload) -> Result<SubmitReceipt, ApiError> {
        tracing::info!(name = %payload.name, "Creating recipe");
        self.send(self.http.post(self.api("/recipes")).json(payload))
            .await
    }

    async fn update_recipe(
        &self,
        recipe_id: &str,
        payload: &RecipePayload,
    ) -> Result<SubmitReceipt, ApiError> {
        tracing::info!(recipe_id, name = %payload.name, "Updating recipe");
        self.send(
            self.http
                .put(self.api(&format!("/recipes/{}", recipe_id)))
                .json(payload),
        )
        .await
    }
}

#[async_trait]
impl CatalogBackend for BackendClient {
    async fn search_ingredients(&self, term: &str) -> Result<Vec<Suggestion>, ApiError> {
        tracing::debug!(term, "Searching ingredients");
        self.send(
            self.http
                .get(self.api("/ingredients"))
                .query(&[("search", term)]),
        )
        .await
    }

    async fn create_ingredient(&self, name: &str) -> Result<CatalogId, ApiError> {
        let created: CreatedIngredient = self
            .send(
                self.http
                    .post(self.api("/ingredients"))
                    .json(&NewIngredient { name }),
            )
            .await?;
        Ok(created.id)
    }

    async fn search_brands(
        &self,
        ingredient: &CatalogId,
        term: &str,
    ) -> Result<Vec<Suggestion>, ApiError> {
        tracing::debug!(%ingredient, term, "Searching brands");
        self.send(
            self.http
                .get(self.api("/brands"))
                .query(&[("ingredient_id", ingredient.as_str()), ("search", term)]),
        )
        .await
    }

    async fn create_brand(
        &self,
        ingredient: &CatalogId,
        name: &str,
    ) -> Result<CatalogId, ApiError> {
        let created: CreatedBrand = self
            .send(self.http.post(self.api("/brands")).json(&NewBrand {
                name,
                ingredient_id: ingredient,
                is_verified: false,
            }))
            .await?;
        created
            .brand_id
            .or(created.id)
            .ok_or_else(|| ApiError::Malformed {
                excerpt: "brand response carried no id".to_string(),
            })
    }
}

/// Turn a status code and raw body into a typed value.
///
/// - non-2xx: `Status` with the body's `message` when it has one
///   (`Unauthorized` for a bare 401)
/// - 2xx with `"status": "error"`: `Rejected`
/// - anything that is not the expected JSON: `Malformed` with an excerpt
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string);

    if !(200..300).contains(&status) {
        tracing::warn!(status, body = %body_excerpt(body), "Backend returned an error status");
        if status == 401 && message.is_none() {
            return Err(ApiError::Unauthorized);
        }
        return Err(ApiError::Status { status, message });
    }

    let Some(value) = parsed else {
        return Err(ApiError::Malformed {
            excerpt: body_excerpt(body),
        });
    };

    if value.get("status").and_then(|s| s.as_str()) == Some("error") {
        return Err(ApiError::Rejected {
            message: message.unwrap_or_else(|| "API error".to_string()),
        });
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Response did not match the expected shape");
        ApiError::Malformed {
            excerpt: body_excerpt(body),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post, put},
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;

    #[test]
    fn test_decode_success() {
        let receipt: SubmitReceipt =
            decode_response(200, r#"{"status":"success","message":"ok","id":"r-1"}"#).unwrap();
        assert_eq!(receipt.id.as_deref(), Some("r-1"));
    }

    #[test]
    fn test_decode_status_with_message() {
        let err = decode_response::<Ack>(
            403,
            r#"{"status":"error","message":"You don't have permission to edit this recipe"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 403, .. }));
        assert_eq!(
            err.user_message(),
            "You don't have permission to edit this recipe"
        );
    }

    #[test]
    fn test_decode_bare_401_is_unauthorized() {
        let err = decode_response::<Ack>(401, "<html>login</html>").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_decode_rejected_in_2xx() {
        let err = decode_response::<Ack>(200, r#"{"status":"error","message":"nope"}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref message } if message == "nope"));
    }

    #[test]
    fn test_decode_malformed_keeps_excerpt() {
        let body = format!("<!DOCTYPE html>{}", "a".repeat(400));
        let err = decode_response::<Ack>(200, &body).unwrap_err();
        match err {
            ApiError::Malformed { excerpt } => {
                assert!(excerpt.starts_with("<!DOCTYPE html>"));
                assert_eq!(excerpt.chars().count(), 201);
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        let err = decode_response::<Vec<Suggestion>>(200, r#"{"items":[]}"#).unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    async fn fake_backend() -> String {
        async fn ingredients(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
            let term = q.get("search").cloned().unwrap_or_default();
            Json(json!([{"id": "i-1", "name": format!("{} flakes", term)}]))
        }
        async fn brands(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
            match q.get("ingredient_id") {
                Some(id) => Json(json!([{"id": format!("b-{}", id), "name": "Maldon"}]))
                    .into_response(),
                None => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"status": "error", "message": "ingredient_id is required"})),
                )
                    .into_response(),
            }
        }
        async fn create_brand(Json(body): Json<Value>) -> Json<Value> {
            assert_eq!(body["is_verified"], false);
            Json(json!({"status": "success", "brand_id": "b-new", "branded_ingredient_id": "bi-9"}))
        }
        async fn create_recipe(Json(body): Json<Value>) -> Json<Value> {
            Json(json!({"status": "success", "message": "Recipe saved", "id": body["name"]}))
        }
        async fn update_recipe(Path(id): Path<String>) -> impl IntoResponse {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"status": "error", "message": format!("Recipe {} not found", id)})),
            )
        }
        async fn login() -> impl IntoResponse {
            (
                [(header::SET_COOKIE, "session=abc123; Path=/")],
                Json(json!({
                    "status": "success",
                    "user": {"id": "u-1", "email": "cook@example.com", "first_name": "Ria"}
                })),
            )
        }
        async fn user(headers: HeaderMap) -> impl IntoResponse {
            let cookie = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if cookie.contains("session=abc123") {
                Json(json!({"id": "u-1", "email": "cook@example.com"})).into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"status": "error", "message": "Not authenticated"})),
                )
                    .into_response()
            }
        }

        let app = Router::new()
            .route("/api/ingredients", get(ingredients))
            .route("/api/brands", get(brands).post(create_brand))
            .route("/api/recipes", post(create_recipe))
            .route("/api/recipes/{id}", put(update_recipe))
            .route("/auth/api/login", post(login))
            .route("/auth/api/user", get(user));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> BackendClient {
        BackendClient::new(&format!("{}/api", base), &format!("{}/auth/api", base)).unwrap()
    }

    #[tokio::test]
    async fn test_catalog_search_sends_query() {
        let base = fake_backend().await;
        let client = client_for(&base);

        let found = client.search_ingredients("sea salt").await.unwrap();
        assert_eq!(found, vec![Suggestion::new("i-1", "sea salt flakes")]);

        let brands = client
            .search_brands(&CatalogId::new("i-1"), "mal")
            .await
            .unwrap();
        assert_eq!(brands[0].id, Some(CatalogId::new("b-i-1")));
    }

    #[tokio::test]
    async fn test_create_brand_reads_brand_id() {
        let base = fake_backend().await;
        let client = client_for(&base);
        let id = client
            .create_brand(&CatalogId::new("i-1"), "Maldon")
            .await
            .unwrap();
        assert_eq!(id, CatalogId::new("b-new"));
    }

    #[tokio::test]
    async fn test_recipe_create_and_failed_update() {
        let base = fake_backend().await;
        let client = client_for(&base);
        let payload = RecipePayload {
            name: "Pasta".into(),
            story: String::new(),
            servings: 2,
            image: None,
            ingredients: vec![],
            steps: vec![],
        };

        let receipt = client.create_recipe(&payload).await.unwrap();
        assert_eq!(receipt.id.as_deref(), Some("Pasta"));

        let err = client.update_recipe("r-404", &payload).await.unwrap_err();
        assert_eq!(err.user_message(), "Recipe r-404 not found");
    }

    #[tokio::test]
    async fn test_login_cookie_carries_over_and_restores() {
        let base = fake_backend().await;
        let client = client_for(&base);

        let err = client.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        let user = client
            .login(&Credentials {
                email: "cook@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.display_name(), "Ria");
        assert_eq!(client.current_user().await.unwrap().id, "u-1");

        let header = client.cookie_header().unwrap();
        assert!(header.contains("session=abc123"));

        let fresh = client_for(&base);
        fresh.restore_cookies(&header);
        assert_eq!(fresh.current_user().await.unwrap().email, "cook@example.com");
    }

    #[tokio::test]
    async fn test_transport_error_when_backend_down() {
        let client = BackendClient::new("http://127.0.0.1:9/api", "http://127.0.0.1:9/auth/api")
            .unwrap();
        let err = client.search_ingredients("salt").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
