//! Auth HTTP handlers: register, login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;
use crate::models::{Role, User};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

fn respond_with_token(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = state
        .tokens()
        .issue(user.id, &user.username, user.role)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("issue token: {}", e)))?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate().map_err(|e| {
        if body.username.is_empty() || body.email.is_empty() || body.password.is_empty() {
            AppError::fields_required()
        } else {
            AppError::Validation(e.to_string())
        }
    })?;

    let user = state
        .credentials()
        .register(&body.username, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(respond_with_token(&state, user)?)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .credentials()
        .authenticate(&body.username, &body.password)
        .await?;
    tracing::info!(user_id = user.id, "login");
    Ok(Json(respond_with_token(&state, user)?))
}
