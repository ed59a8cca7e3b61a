//! HTTP handlers: banner, health probe, 404 fallback.

use axum::{
    extract::{FromRef, State},
    http::{Method, StatusCode, Uri},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::auth::{CredentialStore, PasswordService, TokenService};
use crate::db::DbPool;
use crate::jobs::JobBoard;

/// Shared application state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub tokens: TokenService,
    pub credentials: CredentialStore,
    pub jobs: JobBoard,
}

impl AppState {
    pub fn new(db: DbPool, tokens: TokenService, passwords: PasswordService) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone(), passwords),
            jobs: JobBoard::new(db.clone()),
            db,
            tokens,
        }
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
    pub fn jobs(&self) -> &JobBoard {
        &self.jobs
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Job board API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/health — liveness probe including the database.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match sqlx::query("SELECT 1").execute(state.db()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "connected",
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "database": "unreachable",
                })),
            )
        }
    }
}

/// Unmatched routes.
pub async fn fallback(method: Method, uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Route not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
