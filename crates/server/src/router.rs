use super::{errors::panic_response, handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
///
/// The CORS layer wraps the whole router, so it also answers `OPTIONS`
/// pre-flight requests for every path. Panics are caught inside it, so the
/// resulting 500 still carries CORS headers.
pub fn create_router(app_state: AppState) -> Router {
    let cors = app_state.cors.layer();
    let max_upload_bytes = app_state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/upload",
            post(handlers::upload_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/documents/{id}", get(handlers::get_document_handler))
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
