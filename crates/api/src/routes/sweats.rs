use crate::data::sweats::{DeletedSweat, SweatView};
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde_json::Value;
use sweats::data::types::sweat_record::{NewSweat, SweatPatch};
use sweats::upstream::urchin::tag_summary;

async fn get_sweats_handler(State(state): State<AppState>) -> Result<Json<Vec<SweatView>>> {
    let sweats = state
        .store
        .list_sweats()
        .await
        .map_err(AppError::persistence("Failed to fetch sweats"))?;
    Ok(Json(sweats.into_iter().map(Into::into).collect()))
}

async fn create_sweat_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = payload?;
    let mut input =
        NewSweat::from_json(&body).map_err(AppError::persistence("Failed to add sweat"))?;

    // Tags are nice to have; a failed lookup never stops the record from being saved.
    match state.upstream.lookup_tags(&input.username).await {
        Ok(tags) => input.urchin_tag = tag_summary(&tags),
        Err(err) => tracing::warn!(
            username = %input.username,
            "Skipping Urchin tag for new sweat: {err}"
        ),
    }

    let sweat = state
        .store
        .create_sweat(input)
        .await
        .map_err(AppError::persistence("Failed to add sweat"))?;

    Ok((StatusCode::CREATED, Json(SweatView::from(sweat))).into_response())
}

async fn delete_sweat_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedSweat>> {
    let deleted_id = state
        .store
        .delete_sweat(&id)
        .await
        .map_err(AppError::persistence("Failed to delete sweat"))?;
    Ok(Json(DeletedSweat {
        ok: true,
        deleted_id,
    }))
}

async fn update_sweat_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SweatView>> {
    let Json(body) = payload?;
    let patch =
        SweatPatch::from_json(&body).map_err(AppError::persistence("Failed to update sweat"))?;
    let sweat = state
        .store
        .update_sweat(&id, &patch)
        .await
        .map_err(AppError::persistence("Failed to update sweat"))?;
    Ok(Json(sweat.into()))
}

pub fn sweats_routes() -> Router<AppState> {
    Router::new()
        .route("/sweats", get(get_sweats_handler).post(create_sweat_handler))
        .route(
            "/sweats/{id}",
            delete(delete_sweat_handler).patch(update_sweat_handler),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{app_with, read_json, request};
    use axum::http::Method;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use sweats::config::Config;
    use sweats::data::memory::MemoryStore;
    use sweats::data::store::SweatStore;
    use sweats::testing::{FailingStore, config_for, spawn_upstream};
    use sweats::upstream::Upstream;
    use tower::ServiceExt;

    const UNKNOWN_ID: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

    /// Urchin answers with two tags for "Steve" and fails for everyone else.
    async fn urchin_upstream() -> Upstream {
        let router = Router::new().route(
            "/player/{name}",
            get(|Path(name): Path<String>| async move {
                if name == "Steve" {
                    Ok(Json(json!({
                        "uuid": "8667ba71b85a4004af54457a9734eed7",
                        "tags": [{ "type": "sniper" }, { "type": "closet_cheater" }],
                    })))
                } else {
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }),
        );
        Upstream::new(&config_for(&spawn_upstream(router).await))
    }

    /// Urchin takes longer to answer than the client is willing to wait.
    async fn slow_urchin_upstream() -> Upstream {
        let router = Router::new().route(
            "/player/{name}",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(8)).await;
                Json(json!({ "tags": [{ "type": "sniper" }] }))
            }),
        );
        Upstream::new(&config_for(&spawn_upstream(router).await))
    }

    fn offline_upstream() -> Upstream {
        Upstream::new(&Config::default())
    }

    #[tokio::test]
    async fn test_create_without_username_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), offline_upstream());

        let response = app
            .oneshot(request(Method::POST, "/sweats", Some(json!({ "star": 300 }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await, json!({ "error": "username is required" }));
        assert!(store.list_sweats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_username_only_applies_defaults() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), offline_upstream());

        let response = app
            .oneshot(request(Method::POST, "/sweats", Some(json!({ "username": "Steve" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["username"], json!("Steve"));
        for field in [
            "star", "fkdr", "wlr", "bblr", "kdr", "finals", "finalDeaths", "beds", "bedsLost",
            "kills", "deaths",
        ] {
            assert_eq!(body[field].as_f64(), Some(0.0), "{field} should default to 0");
        }
        for flag in ["milo", "potat", "aballs", "zoiv"] {
            assert_eq!(body[flag], json!(false), "{flag} should default to false");
        }
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(body["dateAdded"], json!(today));
        assert!(body["_id"].is_string());
        assert!(body["createdAt"].is_string());
        // No key configured, so the tag lookup failed and the tag stays unset.
        assert!(body.get("urchinTag").is_none());
        assert_eq!(store.list_sweats().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_stores_joined_tags() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), urchin_upstream().await);

        let response = app
            .oneshot(request(
                Method::POST,
                "/sweats",
                Some(json!({ "username": "Steve", "urchinTag": "ignored", "milo": "yes" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["urchinTag"], json!("sniper, closet_cheater"));
        assert_eq!(body["milo"], json!(true));
    }

    #[tokio::test]
    async fn test_tag_lookup_failure_still_creates_record() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), urchin_upstream().await);

        let response = app
            .oneshot(request(Method::POST, "/sweats", Some(json!({ "username": "Alex" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = store.list_sweats().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].urchin_tag.is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = Arc::new(MemoryStore::new());
        for name in ["first", "second", "third"] {
            store.create_sweat(NewSweat::new(name)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let app = app_with(store, offline_upstream());

        let response = app.oneshot(request(Method::GET, "/sweats", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let store = Arc::new(MemoryStore::new());
        let sweat = store.create_sweat(NewSweat::new("Steve")).await.unwrap();
        let id = sweat.id().to_string();

        let app = app_with(store.clone(), offline_upstream());
        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &format!("/sweats/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "ok": true, "deletedId": id }));

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/sweats", None))
            .await
            .unwrap();
        assert_eq!(read_json(response).await, json!([]));

        let response = app
            .oneshot(request(Method::DELETE, &format!("/sweats/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await, json!({ "error": "Sweat not found" }));
    }

    #[tokio::test]
    async fn test_patch_only_touches_allow_listed_fields() {
        let store = Arc::new(MemoryStore::new());
        let mut input = NewSweat::new("Steve");
        input.stats.star = 512.0;
        let sweat = store.create_sweat(input).await.unwrap();
        let id = sweat.id().to_string();

        let app = app_with(store.clone(), offline_upstream());
        let response = app
            .oneshot(request(
                Method::PATCH,
                &format!("/sweats/{id}"),
                Some(json!({ "milo": true, "extraField": "x", "star": 1, "username": "Alex" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["milo"], json!(true));
        assert_eq!(body["username"], json!("Steve"));
        assert_eq!(body["star"].as_f64(), Some(512.0));
        assert!(body.get("extraField").is_none());

        let stored = &store.list_sweats().await.unwrap()[0];
        assert!(stored.milo);
        assert_eq!(stored.stats.star, 512.0);
        assert_eq!(stored.created_ts, sweat.created_ts);
    }

    #[tokio::test]
    async fn test_patch_missing_record_is_not_found() {
        let app = app_with(Arc::new(MemoryStore::new()), offline_upstream());
        let response = app
            .oneshot(request(
                Method::PATCH,
                &format!("/sweats/{UNKNOWN_ID}"),
                Some(json!({ "zoiv": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_slow_tag_lookup_is_abandoned() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), slow_urchin_upstream().await);

        let started = Instant::now();
        let response = app
            .oneshot(request(Method::POST, "/sweats", Some(json!({ "username": "Steve" }))))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(7));
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert!(body.get("urchinTag").is_none());
        assert_eq!(store.list_sweats().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_failures_are_server_errors() {
        let app = app_with(Arc::new(FailingStore), offline_upstream());
        let cases = [
            (Method::GET, "/sweats".to_string(), None, "Failed to fetch sweats"),
            (
                Method::POST,
                "/sweats".to_string(),
                Some(json!({ "username": "Steve" })),
                "Failed to add sweat",
            ),
            (
                Method::DELETE,
                format!("/sweats/{UNKNOWN_ID}"),
                None,
                "Failed to delete sweat",
            ),
            (
                Method::PATCH,
                format!("/sweats/{UNKNOWN_ID}"),
                Some(json!({ "milo": true })),
                "Failed to update sweat",
            ),
        ];

        for (method, uri, body, message) in cases {
            let response = app
                .clone()
                .oneshot(request(method.clone(), &uri, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
            assert_eq!(read_json(response).await, json!({ "error": message }));
        }
    }
}
