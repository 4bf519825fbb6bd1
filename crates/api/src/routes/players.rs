use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;
use sweats::error::UpstreamError;
use sweats::upstream::TagLookup;

async fn mojang_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    let profile = state
        .upstream
        .lookup_profile(&username)
        .await
        .map_err(|err| match err {
            UpstreamError::NotFound => AppError::NotFound("Not found"),
            err => AppError::upstream("Failed to fetch Mojang profile")(err),
        })?;
    Ok(Json(profile))
}

async fn player_handler(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Value>> {
    let stats = state
        .upstream
        .lookup_player_stats(&uuid)
        .await
        .map_err(AppError::upstream("Failed to fetch player stats"))?;
    Ok(Json(stats))
}

/// Always 200: either Urchin's body or `{error, username}`.
async fn urchin_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<TagLookup> {
    Json(state.upstream.lookup_tags_or_fallback(&username).await)
}

pub fn players_routes() -> Router<AppState> {
    Router::new()
        .route("/mojang/{username}", get(mojang_handler))
        .route("/player/{uuid}", get(player_handler))
        .route("/urchin/{username}", get(urchin_handler))
}
