//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::errors::ErrorKind;

use logievents_core::error::CoreError;
use logievents_core::roles::Role;
use logievents_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Legacy header some clients still send instead of `Authorization`.
const TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated user extracted from a bearer token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role.as_str(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's parsed role.
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing authentication token".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                AppError::TokenExpired
            } else {
                AppError::Core(CoreError::Unauthorized("Invalid token".into()))
            }
        })?;

        let role = Role::parse(&claims.role).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Unknown role in token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}

/// Pull the token out of `Authorization: Bearer <t>`, falling back to the
/// legacy `x-auth-token` header carrying the raw token.
fn bearer_token(parts: &Parts) -> Option<&str> {
    if let Some(value) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
    {
        return value.strip_prefix("Bearer ");
    }
    parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
