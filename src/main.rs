mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_doc::ApiDoc;
use config::Config;
use state::AppState;
use store::FileStore;

/// Build the full application router
///
/// The guarded watch-list route sits next to the generic record routes;
/// static segments win over the `{collection}` captures, so only the two
/// guarded paths see the duplicate check.
fn app_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(
            routes::WATCH_LIST,
            post(handlers::add_watch_handler).fallback(handlers::watch_passthrough_handler),
        )
        .route(
            routes::COLLECTION,
            get(handlers::list_records_handler).post(handlers::create_record_handler),
        )
        .route(
            routes::RECORD,
            get(handlers::get_record_handler)
                .put(handlers::replace_record_handler)
                .delete(handlers::delete_record_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("watchlist-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = FileStore::open(&config.db_path).await?;

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app_router(state))
        .await
        .context("Server error")?;

    Ok(())
}
