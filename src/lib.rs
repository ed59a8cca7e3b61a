//! Job board backend: user accounts with JWT authentication and a moderated
//! job listing workflow (submit, pending, approved or deleted).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;

pub use config::Config;
pub use error::AppError;
pub use handlers::AppState;

use axum::routing::{delete, get, post, put};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router. Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let api_routes = axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/admin/jobs", get(jobs::list_pending_jobs))
        .route("/admin/jobs/:id/approve", put(jobs::approve_job))
        .route("/admin/jobs/:id", delete(jobs::delete_job));

    axum::Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api_routes)
        .fallback(handlers::fallback)
        .with_state(state)
}

/// Router with request tracing and a per-request deadline. A request that
/// runs past the deadline is dropped, cancelling its in-flight queries.
pub fn create_app_with_timeout(state: AppState, request_timeout: Duration) -> axum::Router {
    create_app(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
