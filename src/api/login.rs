use std::sync::Arc;

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::auth::verify_password;
use crate::error::{ApiError, ApiResult};

/// OAuth2 password-grant form; `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub(super) async fn access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .db
        .find_user_by_email(&form.username)
        .await?
        .filter(|u| verify_password(&form.password, &u.hashed_password))
        .ok_or_else(|| ApiError::BadRequest("Incorrect email or password".to_string()))?;

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let access_token = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("User {} signed in", user.email);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
