use crate::routes::{players::players_routes, sweats::sweats_routes};
use crate::state::AppState;
use axum::http::{Method, header};
use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

async fn ping() -> Json<Value> {
    Json(json!({ "ok": true, "ts": Utc::now().timestamp_millis() }))
}

pub fn create_api(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        // allow requests from any origin
        .allow_origin(Any);

    Router::new()
        .route("/ping", get(ping))
        .merge(players_routes())
        .merge(sweats_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
