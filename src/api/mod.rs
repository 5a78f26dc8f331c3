pub mod listing;
pub mod objects;

use std::sync::Arc;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the gateway router / 构建路由
///
/// Every path and method reaches the object handler, which answers 405 for
/// anything but GET before looking at the path.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(objects::get_object)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
