use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use upkeep_api::auth::{generate_token, Claims};
use upkeep_api::routes::{app, AppState};
use upkeep_api::services::AssetService;
use upkeep_api::store::MemoryAssetStore;

/// Fresh router over an empty in-memory store. Each test gets its own world.
pub fn test_app() -> Router {
    let service = AssetService::new(Arc::new(MemoryAssetStore::new()));
    app(AppState { service })
}

/// Bearer header value for a signed token carrying `user` as the subject.
/// Relies on the development-profile JWT secret.
pub fn bearer(user: &str) -> String {
    let token = generate_token(Claims::new(user)).expect("token generation");
    format!("Bearer {}", token)
}

/// Drive one request through the router without binding a socket.
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Result<Response<Body>> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    Ok(app.clone().oneshot(request).await?)
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Send and assert status in one go, returning the parsed body.
pub async fn send_expect(
    app: &Router,
    method: &str,
    path: &str,
    auth: Option<&str>,
    body: Option<Value>,
    expected: StatusCode,
) -> Result<Value> {
    let response = send(app, method, path, auth, body).await?;
    let status = response.status();
    let json = body_json(response).await?;
    assert_eq!(status, expected, "unexpected status, body: {}", json);
    Ok(json)
}
