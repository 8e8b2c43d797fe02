//! HTTP gateway exposing the optimiser.
//!
//! # Endpoints
//!
//! - `GET /api/health` - liveness probe
//! - `POST /api/optimize` - optimise a depot and its locations, rate limited
//!   per client address

mod error;
mod handlers;
mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tourgate_core::RouteOptimizer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use rate_limit::{RateLimitRule, RateLimitRuleError, RateLimiter};

use crate::config::{CorsOrigins, ServeConfig};
use crate::{CliError, build_optimizer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    optimizer: Arc<dyn RouteOptimizer>,
    limiter: Arc<RateLimiter>,
}

impl AppState {
    /// State serving `optimizer` behind a limiter enforcing `rule`.
    #[must_use]
    pub fn new(optimizer: Arc<dyn RouteOptimizer>, rule: RateLimitRule) -> Self {
        Self {
            optimizer,
            limiter: Arc::new(RateLimiter::new(rule)),
        }
    }
}

/// Build the API router.
///
/// Rate limiting reads the client address from
/// [`ConnectInfo<SocketAddr>`](axum::extract::ConnectInfo); serve the router
/// with `into_make_service_with_connect_info::<SocketAddr>()` or every
/// client shares one window.
pub fn router(state: AppState, cors: &CorsOrigins) -> Router {
    let limited = Router::new()
        .route("/api/optimize", post(handlers::optimize))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.limiter),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/api/health", get(handlers::health))
        .merge(limited)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.iter().cloned())),
    }
}

/// Build the optimiser and serve the API until Ctrl-C.
///
/// # Errors
///
/// Returns [`CliError`] when the optimiser cannot be built, the address
/// cannot be bound, or the server fails.
pub async fn serve(config: ServeConfig) -> Result<(), CliError> {
    let optimizer = build_optimizer(&config.pipeline)?;
    let app = router(AppState::new(optimizer, config.rate_limit), &config.cors);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .map_err(|source| CliError::Bind {
            address: config.bind_address,
            source,
        })?;
    log::info!(
        "listening on http://{} (rate limit {}, max {} locations)",
        config.bind_address,
        config.rate_limit,
        config.pipeline.limits.max_locations
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(CliError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}
