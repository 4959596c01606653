use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{AddWatchItemRequest, AddWatchItemResponse, DeleteResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "watchlist-api",
        version = "1.0.0",
        description = "A REST facade over a flat JSON document store, with duplicate-guarded 'to watch' lists"
    ),
    paths(
        handlers::health::health_handler,
        handlers::watch::add_watch_handler,
        handlers::records::list_records_handler,
        handlers::records::get_record_handler,
        handlers::records::create_record_handler,
        handlers::records::replace_record_handler,
        handlers::records::delete_record_handler
    ),
    components(
        schemas(
            AddWatchItemRequest,
            AddWatchItemResponse,
            DeleteResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "to-watch", description = "Duplicate-guarded watch-list inserts"),
        (name = "records", description = "Generic document store operations")
    )
)]
pub struct ApiDoc;
