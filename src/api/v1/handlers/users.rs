/*
 * Responsibility
 * - /users handlers (registration and lookup of identities)
 * - registration stores a bcrypt hash; logging in happens at the token issuer
 * - users are addressed by UUID directly (the token subject)
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::{AppJson, AppPath},
    },
    error::AppError,
    repos::user_repo::UserRow,
    state::AppState,
};

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            location: row.location,
        }
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = state.users.list().await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let new_user = req.validate().map_err(AppError::validation)?;

    let password_hash = state.hasher.hash(new_user.password).await.map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let row = state
        .users
        .create(
            &new_user.username,
            &password_hash,
            new_user.location.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %row.id, "user created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .get(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}
