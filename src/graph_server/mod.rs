mod error;
mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::flat_store::FlatStore;

pub use error::{ErrorDetails, ErrorLayer, Result, ServerError, NO_ROOT_MESSAGE};
pub use handlers::handle_graph_data;

pub const GRAPH_DATA_ROUTE: &str = "/api/graph-data";

/// Build the application: the graph-data API, plus the frontend bundle out of
/// `static_dir` with its `index.html` standing in for any other path so the
/// single page app can do its own routing.
pub fn make_router(store: Arc<FlatStore>, static_dir: &Path) -> Router {
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(GRAPH_DATA_ROUTE, get(handle_graph_data))
        .fallback_service(frontend)
        .layer(Extension(store))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
