//! Handlers for the `/users` resource (admin-only user management).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::roles::ALL_ROLES;
use logievents_core::types::DbId;

use logievents_db::models::user::{CreateUser, UpdateUser, UserResponse};
use logievents_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;
use crate::PaginationParams;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PagedEnvelope<UserResponse>>> {
    authorize(&user, Verb::Get, ResourceKind::Users)?;

    let (users, total) = UserRepo::list(&state.pool, params.page, params.limit).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(PagedEnvelope::new(
        data,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<UserResponse>>> {
    authorize(&user, Verb::Get, ResourceKind::Users)?;

    let found = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(Envelope::new(UserResponse::from(&found))))
}

/// POST /api/v1/users
///
/// Create a user with an explicit role. Validates password strength and the
/// role spelling before hashing.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Envelope<UserResponse>>)> {
    authorize(&user, Verb::Post, ResourceKind::Users)?;
    input.validate()?;
    validate_role(&input.role)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hashed,
        role: input.role,
    };

    let created = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(UserResponse::from(&created))),
    ))
}

/// PUT /api/v1/users/{id}
///
/// Update a user's profile fields (not password).
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<Envelope<UserResponse>>> {
    authorize(&user, Verb::Put, ResourceKind::Users)?;
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    let update_dto = UpdateUser {
        username: input.username,
        email: input.email,
        role: input.role,
        is_active: input.is_active,
    };

    let updated = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(Envelope::new(UserResponse::from(&updated))))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deactivate a user. Self-deletion is rejected even for admins, so a
/// deployment always retains at least the caller's account.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    authorize(&user, Verb::Delete, ResourceKind::Users)?;

    if id == user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Self-deletion is not allowed".into(),
        )));
    }

    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        Ok(Json(MessageEnvelope::new("User deactivated")))
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// POST /api/v1/users/{id}/reset-password
///
/// Admin-initiated password reset.
pub async fn reset_password(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageEnvelope>> {
    authorize(&user, Verb::Post, ResourceKind::Users)?;
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::update_password(&state.pool, id, &hashed).await?;
    if updated {
        Ok(Json(MessageEnvelope::new("Password updated")))
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_role(role: &str) -> Result<(), AppError> {
    if ALL_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "role: '{role}' is not one of {ALL_ROLES:?}"
        ))))
    }
}
