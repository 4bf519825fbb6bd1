use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use sweats::data::error::DataError;
use sweats::error::UpstreamError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(&'static str),
    /// The store failed; `message` is what the caller sees.
    Persistence {
        message: &'static str,
        source: DataError,
    },
    /// A third-party API failed; its detail is passed along.
    Upstream {
        message: &'static str,
        source: UpstreamError,
    },
}

impl AppError {
    /// Maps a store error for a route: bad input is a 400, a missing record a 404, and
    /// anything else a 500 carrying `message`.
    pub fn persistence(message: &'static str) -> impl Fn(DataError) -> AppError {
        move |source| match source {
            DataError::InvalidInput(reason) => AppError::BadRequest(reason),
            DataError::DocumentNotFound => AppError::NotFound("Sweat not found"),
            source => AppError::Persistence { message, source },
        }
    }

    pub fn upstream(message: &'static str) -> impl Fn(UpstreamError) -> AppError {
        move |source| AppError::Upstream { message, source }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::Persistence { message, source } => {
                tracing::error!("{message}: {source:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
            AppError::Upstream { source, .. } if source.is_config() => {
                tracing::error!("{source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": source.to_string() })),
                )
                    .into_response()
            }
            AppError::Upstream { message, source } => {
                tracing::error!("{message}: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message, "details": source.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(reason) => write!(f, "Bad request: {}", reason),
            AppError::NotFound(message) => write!(f, "Not found: {}", message),
            AppError::Persistence { message, source } => write!(f, "{}: {}", message, source),
            AppError::Upstream { message, source } => write!(f, "{}: {}", message, source),
        }
    }
}
