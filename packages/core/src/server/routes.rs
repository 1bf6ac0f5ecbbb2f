//! Route table: `GET /{key}` plus JSON 404/405 fallbacks.

use crate::store::SecretStore;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Build the lookup router over an immutable store.
pub fn build_routes(store: Arc<SecretStore>) -> Router {
    Router::new()
        .route("/{key}", get(get_secret).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(store)
}

/// Error body returned for every non-200 response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: &'static str,
}

/// Client-facing lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    SecretNotFound,
    RouteNotFound,
    MethodNotAllowed,
}

impl ApiError {
    fn status(self) -> StatusCode {
        match self {
            Self::SecretNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn detail(self) -> &'static str {
        match self {
            Self::SecretNotFound => "Secret not found",
            Self::RouteNotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}

async fn get_secret(
    State(store): State<Arc<SecretStore>>,
    Path(key): Path<String>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    let value = store.get(&key).ok_or(ApiError::SecretNotFound)?.to_string();
    Ok(Json(HashMap::from([(key, value)])))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let store: SecretStore = vec![
            ("API_KEY".to_string(), "abc123".to_string()),
            ("password".to_string(), "hunter2".to_string()),
        ]
        .into_iter()
        .collect();
        build_routes(Arc::new(store))
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_existing_secret() {
        let (status, body) = send(Method::GET, "/API_KEY").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"API_KEY": "abc123"}));
    }

    #[tokio::test]
    async fn test_get_missing_secret() {
        let (status, body) = send(Method::GET, "/NOPE").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"detail": "Secret not found"}));
    }

    #[tokio::test]
    async fn test_root_is_not_a_secret() {
        let (status, body) = send(Method::GET, "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"detail": "Not Found"}));
    }

    #[tokio::test]
    async fn test_nested_path_is_not_a_secret() {
        let (status, _) = send(Method::GET, "/app/password").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let (status, body) = send(Method::POST, "/API_KEY").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, serde_json::json!({"detail": "Method Not Allowed"}));
    }
}
