//! Bearer-token guard for admin routes.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use super::AppState;
use crate::error::ApiError;
use crate::models::User;

/// An authenticated administrator.
///
/// Rejections: no bearer token (401), token that fails verification (403),
/// unknown user (404), user without admin rights (400).
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            debug!("Rejected token: {}", e);
            ApiError::Forbidden("Could not validate credentials".to_string())
        })?;

        let user = state
            .db
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if !user.is_admin {
            return Err(ApiError::BadRequest(
                "The user doesn't have enough privileges".to_string(),
            ));
        }

        Ok(AdminUser(user))
    }
}
