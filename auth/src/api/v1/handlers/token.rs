use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::api::v1::dto::{token_request::TokenRequest, token_response::TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    let user_id = state
        .authenticator
        .authenticate(&req.username, &req.password)
        .await?;
    let issued = state.issuer.issue_access_token(user_id)?;

    tracing::info!(sub = %user_id, "access token issued");

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token: issued.access_token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
        }),
    ))
}
