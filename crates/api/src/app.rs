//! Application wiring: shared state, routes and the middleware stack.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use axum::Router;
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiterState;
use crate::middleware::{auth, metrics, rate_limit, security_headers, trace_id};
use crate::routes;

/// Shared application state available to handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub auth_rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Builds the full router with all routes and middleware layers.
pub fn create_app(pool: PgPool, config: Arc<Config>) -> Router {
    let auth_rate_limiter = config.security.auth_rate_limit_enabled.then(|| {
        Arc::new(RateLimiterState::new(
            config.security.auth_rate_limit_per_minute,
            config.security.auth_rate_limit_burst,
        ))
    });

    let state = AppState {
        pool,
        jwt: config.jwt_config(),
        auth_rate_limiter,
        config: config.clone(),
    };

    let cors = build_cors_layer(&config);

    // Health, metrics, and item browsing, no authentication.
    let public_routes = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/health/live", get(routes::health::live))
        .route("/api/health/ready", get(routes::health::ready))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api/items", get(routes::items::list_items))
        .route("/api/items/:id", get(routes::items::get_item));

    // Register and login, rate limited per client.
    let auth_routes = Router::new()
        .route("/api/users/register", post(routes::users::register))
        .route("/api/users/login", post(routes::users::login))
        .route_layer(from_fn_with_state(
            state.clone(),
            rate_limit::auth_rate_limit,
        ));

    // Everything a logged-in user can do.
    let user_routes = Router::new()
        .route(
            "/api/users/me",
            get(routes::users::get_profile).put(routes::users::update_profile),
        )
        .route("/api/users/me/password", put(routes::users::change_password))
        .route("/api/users/me/stats", get(routes::users::my_stats))
        .route("/api/items", post(routes::items::create_item))
        .route("/api/items/mine", get(routes::items::my_items))
        .route(
            "/api/items/:id",
            put(routes::items::update_item).delete(routes::items::delete_item),
        )
        .route(
            "/api/claims",
            post(routes::claims::create_claim).get(routes::claims::list_claims),
        )
        .route("/api/claims/me/stats", get(routes::claims::my_claim_stats))
        .route(
            "/api/claims/:id",
            get(routes::claims::get_claim).delete(routes::claims::delete_claim),
        )
        .route(
            "/api/claims/item/:item_id",
            get(routes::claims::claims_for_item),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    // Admin-only surface.
    let admin_routes = Router::new()
        .route("/api/admin/stats", get(routes::admin::dashboard_stats))
        .route("/api/admin/analytics", get(routes::admin::analytics))
        .route("/api/admin/users", get(routes::admin::list_users))
        .route(
            "/api/admin/users/:id/status",
            put(routes::admin::update_user_status),
        )
        .route("/api/admin/users/:id", delete(routes::admin::delete_user))
        .route("/api/admin/export/items", get(routes::admin::export_items))
        .route("/api/admin/import/items", post(routes::admin::import_items))
        .route(
            "/api/claims/:id/status",
            put(routes::claims::update_claim_status),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(from_fn(trace_id::trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(from_fn(security_headers::security_headers_middleware))
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
