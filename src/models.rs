use serde::{Deserialize, Serialize};

/// Request body for adding an item to a "to watch" list
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddWatchItemRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Response type for a successful watch-list insert
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddWatchItemResponse {
    pub message: String,
    pub title: String,
}

/// Response type for successful DELETE operations
///
/// json-server replies with an empty object, and the store's clients
/// expect that shape.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {}
