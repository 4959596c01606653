use crate::error::{ApiError, ErrorResponse};
use crate::models::DeleteResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::ListFilter;
use axum::{extract::Path, extract::Query, extract::State, http::StatusCode, Json};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Turn the raw query string into a store filter
///
/// `q`, `limit` and `offset` are reserved; every other parameter is an
/// exact-match field filter, the way json-server treats query strings.
fn parse_filter(params: HashMap<String, String>) -> Result<ListFilter, ApiError> {
    let mut filter = ListFilter::default();
    for (key, value) in params {
        match key.as_str() {
            "q" => filter.q = Some(value),
            "limit" => {
                filter.limit = Some(value.parse().map_err(|_| {
                    ApiError::InvalidQueryParam(format!(
                        "limit must be a non-negative integer, got '{}'",
                        value
                    ))
                })?);
            }
            "offset" => {
                filter.offset = value.parse().map_err(|_| {
                    ApiError::InvalidQueryParam(format!(
                        "offset must be a non-negative integer, got '{}'",
                        value
                    ))
                })?;
            }
            _ => filter.fields.push((key, value)),
        }
    }
    Ok(filter)
}

/// GET /:collection handler - List the records of a collection
///
/// Returns the bare record array. Query parameters:
/// - q: case-insensitive substring match against any string value (optional)
/// - limit: maximum number of results to return (optional)
/// - offset: number of results to skip (optional, default: 0)
/// - anything else: exact field equality, e.g. ?rating=8
#[utoipa::path(
    get,
    path = routes::COLLECTION,
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("q" = Option<String>, Query, description = "Substring match against any string value"),
        ("limit" = Option<u32>, Query, description = "Maximum number of results to return"),
        ("offset" = Option<u32>, Query, description = "Number of results to skip")
    ),
    responses(
        (status = 200, description = "Records in the collection", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 404, description = "Collection not found", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn list_records_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<JsonValue>>, ApiError> {
    let filter = parse_filter(params)?;

    match state.store.list(&collection, &filter).await {
        Some(records) => {
            tracing::info!("Listed {} records from {}", records.len(), collection);
            Ok(Json(records))
        }
        None => Err(ApiError::CollectionNotFound(collection)),
    }
}

/// GET /:collection/:id handler - Retrieve a single record
#[utoipa::path(
    get,
    path = routes::RECORD,
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record found", body = serde_json::Value),
        (status = 404, description = "Record not found", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn get_record_handler(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<JsonValue>, ApiError> {
    match state.store.get(&collection, &id).await {
        Some(record) => {
            tracing::debug!("Retrieved record {} from {}", id, collection);
            Ok(Json(record))
        }
        None => Err(ApiError::RecordNotFound { collection, id }),
    }
}

/// POST /:collection handler - Append a record to a collection
///
/// Assigns a UUID id when the body has none. Unknown collections are not
/// created on the fly.
#[utoipa::path(
    post,
    path = routes::COLLECTION,
    params(
        ("collection" = String, Path, description = "Collection name")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Record stored", body = serde_json::Value),
        (status = 404, description = "Collection not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn create_record_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(record): Json<JsonValue>,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    match state.store.insert(&collection, record).await? {
        Some(stored) => {
            tracing::info!("Created record in {}", collection);
            Ok((StatusCode::CREATED, Json(stored)))
        }
        None => Err(ApiError::CollectionNotFound(collection)),
    }
}

/// PUT /:collection/:id handler - Replace a record, keeping its id
#[utoipa::path(
    put,
    path = routes::RECORD,
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record id")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Record replaced", body = serde_json::Value),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn replace_record_handler(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(record): Json<JsonValue>,
) -> Result<Json<JsonValue>, ApiError> {
    match state.store.replace(&collection, &id, record).await? {
        Some(stored) => {
            tracing::info!("Replaced record {} in {}", id, collection);
            Ok(Json(stored))
        }
        None => Err(ApiError::RecordNotFound { collection, id }),
    }
}

/// DELETE /:collection/:id handler - Remove a record
#[utoipa::path(
    delete,
    path = routes::RECORD,
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record removed", body = DeleteResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "records"
)]
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    match state.store.delete(&collection, &id).await? {
        Some(_) => {
            tracing::info!("Deleted record {} from {}", id, collection);
            Ok(Json(DeleteResponse {}))
        }
        None => Err(ApiError::RecordNotFound { collection, id }),
    }
}
