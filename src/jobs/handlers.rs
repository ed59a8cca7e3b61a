//! Job HTTP handlers: public listing, submission, and admin moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{Job, JobFilter, NewJob};

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid id".to_string()))
}

/// GET /api/jobs?search=&category=
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.jobs().list_approved(&filter).await?))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = state.jobs().create(claims.id, &body).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/admin/jobs
pub async fn list_pending_jobs(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.jobs().list_pending().await?))
}

/// PUT /api/admin/jobs/:id/approve
pub async fn approve_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id)?;
    tracing::debug!(admin_id = admin.id, job_id = id, "approve requested");
    Ok(Json(state.jobs().approve(id).await?))
}

/// DELETE /api/admin/jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    tracing::debug!(admin_id = admin.id, job_id = id, "delete requested");
    state.jobs().delete(id).await?;
    Ok(Json(json!({ "message": "Job deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("17").unwrap(), 17);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id(""), Err(AppError::Validation(_))));
    }
}
