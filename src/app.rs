use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::session_middleware;
use crate::state::AppState;

/// Full HTTP surface with global middleware applied
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Store management
        .merge(store_routes())
        // Store-scoped catalog
        .merge(billboard_routes())
        .merge(category_routes())
        .merge(color_routes())
        .merge(size_routes())
        .merge(product_routes())
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(allowed)
}

fn store_routes() -> Router<AppState> {
    use handlers::stores;

    Router::new()
        .route("/api/stores", get(stores::list).post(stores::create))
        .route(
            "/api/stores/:store_id",
            get(stores::show).patch(stores::update).delete(stores::delete),
        )
}

fn billboard_routes() -> Router<AppState> {
    use handlers::billboards;

    Router::new()
        .route(
            "/api/:store_id/billboards",
            get(billboards::list).post(billboards::create),
        )
        .route(
            "/api/:store_id/billboards/:billboard_id",
            get(billboards::show)
                .patch(billboards::update)
                .delete(billboards::delete),
        )
}

fn category_routes() -> Router<AppState> {
    use handlers::categories;

    Router::new()
        .route(
            "/api/:store_id/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/:store_id/categories/:category_id",
            get(categories::show)
                .patch(categories::update)
                .delete(categories::delete),
        )
}

fn color_routes() -> Router<AppState> {
    use handlers::colors;

    Router::new()
        .route("/api/:store_id/colors", get(colors::list).post(colors::create))
        .route(
            "/api/:store_id/colors/:color_id",
            get(colors::show).patch(colors::update).delete(colors::delete),
        )
}

fn size_routes() -> Router<AppState> {
    use handlers::sizes;

    Router::new()
        .route("/api/:store_id/sizes", get(sizes::list).post(sizes::create))
        .route(
            "/api/:store_id/sizes/:size_id",
            get(sizes::show).patch(sizes::update).delete(sizes::delete),
        )
}

fn product_routes() -> Router<AppState> {
    use handlers::products;

    Router::new()
        .route("/api/:store_id/products", get(products::list).post(products::create))
        .route(
            "/api/:store_id/products/:product_id",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Storefront Admin API",
            "version": version,
            "description": "Store-scoped catalog administration backend",
            "endpoints": {
                "health": "/health (public)",
                "stores": "/api/stores[/:store_id] (authenticated)",
                "billboards": "/api/:store_id/billboards[/:billboard_id] (GET public, writes owner-only)",
                "categories": "/api/:store_id/categories[/:category_id] (GET public, writes owner-only)",
                "colors": "/api/:store_id/colors[/:color_id] (GET public, writes owner-only)",
                "sizes": "/api/:store_id/sizes[/:size_id] (GET public, writes owner-only)",
                "products": "/api/:store_id/products[/:product_id] (GET public, writes owner-only)"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
