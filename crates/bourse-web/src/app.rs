use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let stock_routes = Router::new()
        .route("/", get(routes::instruments))
        .route("/:code/history", get(routes::history))
        .route("/:code/full-history", get(routes::full_history))
        .route("/:code/range", get(routes::range));

    let market_routes = Router::new()
        .route("/overview", get(routes::overview))
        .route("/latest", get(routes::latest))
        .route("/dates", get(routes::dates))
        .route("/summary", get(routes::summary));

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .nest("/api/stocks", stock_routes)
        .nest("/api/market", market_routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
