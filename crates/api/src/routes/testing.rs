use crate::api::create_api;
use crate::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;
use sweats::data::store::SweatStore;
use sweats::upstream::Upstream;

pub fn app_with(store: Arc<dyn SweatStore>, upstream: Upstream) -> Router {
    create_api(AppState::with_store(store, upstream))
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
