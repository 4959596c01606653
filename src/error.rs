use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// This error type provides consistent error handling across all endpoints,
/// automatically mapping different error types to appropriate HTTP status codes
/// and formatting them as JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty `title` on a watch-list insert
    TitleRequired,
    /// Title already present in the target watch-list collection
    DuplicateTitle,
    /// Unrecognized watch-list kind in the request path
    UnknownWatchKind(String),
    /// No collection with this name in the document store
    CollectionNotFound(String),
    /// Record not found within a collection
    RecordNotFound { collection: String, id: String },
    /// Invalid query parameter
    InvalidQueryParam(String),
    /// Document store operation error
    StorageError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::TitleRequired => (
                StatusCode::BAD_REQUEST,
                "Title is required".to_string(),
            ),
            ApiError::DuplicateTitle => (
                StatusCode::BAD_REQUEST,
                "Item already exists in the 'To Watch' list".to_string(),
            ),
            ApiError::UnknownWatchKind(kind) => (
                StatusCode::NOT_FOUND,
                format!("Unknown watch list: expected 'movies' or 'series', got '{}'", kind),
            ),
            ApiError::CollectionNotFound(name) => (
                StatusCode::NOT_FOUND,
                format!("Collection not found: {}", name),
            ),
            ApiError::RecordNotFound { collection, id } => (
                StatusCode::NOT_FOUND,
                format!("Record not found: {}/{}", collection, id),
            ),
            ApiError::InvalidQueryParam(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid query parameter: {}", msg),
            ),
            ApiError::StorageError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", err),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StorageError(err)
    }
}
