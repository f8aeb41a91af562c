//! Newsdesk API Gateway
//!
//! Serves the dashboard's data routes.
//! Handles:
//! - Article listing, detail and search
//! - Reports, analytics, sources, alerts and settings
//! - Rate limiting (optional)
//! - Observability (logging, metrics, request ids)

pub mod handlers;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use newsdesk_common::{config::AppConfig, db::Repository};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: Repository,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let mut api_routes = Router::new()
        // Articles
        .route("/articles", get(handlers::articles::list_articles))
        .route("/articles/search", post(handlers::search::search_articles))
        .route("/articles/{id}", get(handlers::articles::get_article))
        // Reports
        .route("/reports", get(handlers::reports::list_reports))
        .route("/reports/{id}", get(handlers::reports::get_report))
        // Analytics
        .route("/analytics", get(handlers::analytics::get_analytics))
        // Sources & alerts
        .route("/sources", get(handlers::sources::list_sources))
        .route("/alerts", get(handlers::sources::list_alerts))
        // Settings
        .route("/settings", get(handlers::settings::get_settings))
        .route(
            "/settings/{section}",
            get(handlers::settings::get_section).put(handlers::settings::update_section),
        );

    if state.config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        api_routes = api_routes.layer(axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                middleware::rate_limit::rate_limit_middleware(req, next, limiter.clone())
            },
        ));
    }

    let static_dir = state.config.server.static_dir.clone();
    let timeout = TimeoutLayer::new(state.config.request_timeout());

    // Compose the app
    let mut app = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::metrics::render))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state);

    // Prebuilt dashboard assets, when configured
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}
