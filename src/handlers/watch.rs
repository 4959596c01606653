use crate::error::{ApiError, ErrorResponse};
use crate::models::{AddWatchItemRequest, AddWatchItemResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::WatchKind;
use axum::{extract::Path, extract::State, http::StatusCode, Json};
use serde_json::Value as JsonValue;

/// POST /to-watch/:kind handler - Add a title to a "to watch" list
///
/// Rejects unrecognized kinds up front and duplicate titles before anything
/// reaches the store. The store performs the duplicate check and the append
/// under one lock, so concurrent requests for the same title cannot both
/// succeed.
#[utoipa::path(
    post,
    path = routes::WATCH_LIST,
    params(
        ("kind" = String, Path, description = "Watch list to target: movies or series")
    ),
    request_body = AddWatchItemRequest,
    responses(
        (status = 201, description = "Item added to the watch list", body = AddWatchItemResponse),
        (status = 400, description = "Missing title or duplicate item", body = ErrorResponse),
        (status = 404, description = "Unknown watch list kind", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "to-watch"
)]
pub async fn add_watch_handler(
    State(state): State<AppState>,
    Path(kind_str): Path<String>,
    Json(body): Json<AddWatchItemRequest>,
) -> Result<(StatusCode, Json<AddWatchItemResponse>), ApiError> {
    let kind = WatchKind::from_path(&kind_str)
        .ok_or_else(|| ApiError::UnknownWatchKind(kind_str.clone()))?;

    let title = match body.title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => return Err(ApiError::TitleRequired),
    };

    match state.store.add_watch_item(kind, title).await? {
        Some(item) => {
            tracing::info!("Added '{}' to {}", item.title, kind.collection());
            Ok((
                StatusCode::CREATED,
                Json(AddWatchItemResponse {
                    message: "Item added to 'To Watch' list".to_string(),
                    title: item.title,
                }),
            ))
        }
        None => {
            tracing::info!("Rejected duplicate '{}' for {}", title, kind.collection());
            Err(ApiError::DuplicateTitle)
        }
    }
}

/// Fallback for non-POST methods on the guarded path
///
/// The guard is additive: any other method behaves exactly as the generic
/// record route would for a collection named `to-watch`, which normally
/// does not exist.
pub async fn watch_passthrough_handler(
    State(state): State<AppState>,
    Path(kind_str): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    match state.store.get("to-watch", &kind_str).await {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::RecordNotFound {
            collection: "to-watch".to_string(),
            id: kind_str,
        }),
    }
}
