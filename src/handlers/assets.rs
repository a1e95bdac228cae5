use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Asset, AssetDraft};
use crate::routes::AppState;

/// GET /api/assets - all assets owned by the caller
pub async fn assets_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    let assets = state.service.list_for_owner(&user.user_id).await?;
    Ok(Json(assets))
}

/// POST /api/assets - create an asset for the caller
pub async fn assets_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<AssetDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = state.service.create(draft, &user.user_id).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// PATCH /api/assets/:id - partial update, dates only. Used by the
/// "mark complete" flow on the frontend.
pub async fn asset_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Json<Asset>, ApiError> {
    let asset = state.service.update_partial(id, &user.user_id, &updates).await?;
    Ok(Json(asset))
}
