//! # Finscope HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /questions` - The questionnaire
//! - `GET /stages` - All stage descriptors
//! - `GET /stages/{n}` - One stage descriptor
//! - `POST /score` - Score answers without recording them
//! - `POST /submissions` - Record a finished questionnaire
//! - `POST /reviews` - Record a review
//! - `GET /admin/submissions` - All submissions with reviews
//! - `GET /admin/export` - Download the assessment export
//!
//! Security settings (CORS origins, rate limit, API key) come from
//! [`FinscopeConfig`]; see the `config` module for the environment overrides.

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ApiKey, keys_match};
pub use handlers::{
    admin_export_handler, admin_submissions_handler, error_status, health_handler,
    questions_handler, review_handler, score_handler, stage_handler, stages_handler,
    submission_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AdminSubmissionsResponse, ErrorResponse, ExportQuery, HealthResponse, OptionJson,
    QuestionJson, ReviewRequest, ReviewResponse, ScoreRequest, ScoreResponse, StageJson,
    SubmissionRequest, SubmissionResponse,
};

use crate::config::FinscopeConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use finscope_core::{AssessmentLedger, FinscopeError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the volatile ledger and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<AssessmentLedger>>,
    pub config: Arc<FinscopeConfig>,
}

impl AppState {
    /// Create new app state with an empty ledger.
    #[must_use]
    pub fn new(config: FinscopeConfig) -> Self {
        let ledger = AssessmentLedger::with_limit(config.server.max_ledger_entries);
        Self::with_ledger(ledger, config)
    }

    /// Create app state around an existing ledger.
    #[must_use]
    pub fn with_ledger(ledger: AssessmentLedger, config: FinscopeConfig) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: a comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(list) => {
            let allowed_origins: Vec<HeaderValue> = list
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication on `/admin/*` (if a key is configured)
pub fn create_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let cors = build_cors_layer(config.security.cors_origins.as_deref());

    let mut admin = Router::new()
        .route("/admin/submissions", get(handlers::admin_submissions_handler))
        .route("/admin/export", get(handlers::admin_export_handler));

    match config.api_key() {
        Some(key) => {
            tracing::info!("API key authentication enabled for /admin routes");
            admin = admin.route_layer(axum_middleware::from_fn_with_state(
                ApiKey::new(key),
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "⚠️  API key authentication DISABLED - /admin routes are publicly accessible! \
                 Set FINSCOPE_API_KEY or [security] api_key to enable authentication."
            );
        }
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/questions", get(handlers::questions_handler))
        .route("/stages", get(handlers::stages_handler))
        .route("/stages/{n}", get(handlers::stage_handler))
        .route("/score", post(handlers::score_handler))
        .route("/submissions", post(handlers::submission_handler))
        .route("/reviews", post(handlers::review_handler))
        .merge(admin);

    let rate_limit = config.security.rate_limit;
    if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(
            config.server.body_limit_bytes,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: FinscopeConfig) -> Result<(), FinscopeError> {
    let addr = config.bind_addr();
    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FinscopeError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Finscope HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FinscopeError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received; in-memory submissions are discarded");
}
