//! Handlers for the `/providers` resource (suppliers).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::roles::Role;
use logievents_core::status::provider_status;
use logievents_core::types::DbId;

use logievents_db::models::provider::{CreateProvider, Provider, UpdateProvider};
use logievents_db::repositories::{CatalogRepo, DeleteOutcome, ProviderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

/// Query parameters for `GET /providers`.
#[derive(Debug, Deserialize)]
pub struct ProviderListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// Request body for `POST /providers`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: String,
    pub phone: Option<String>,
    pub provider_type_id: DbId,
}

/// GET /api/v1/providers
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ProviderListParams>,
) -> AppResult<Json<PagedEnvelope<Provider>>> {
    authorize(&user, Verb::Get, ResourceKind::Providers)?;

    if let Some(status) = &params.status {
        validate_provider_status(status)?;
    }

    let (providers, total) = ProviderRepo::list(
        &state.pool,
        params.status.as_deref(),
        params.page,
        params.limit,
    )
    .await?;
    Ok(Json(PagedEnvelope::new(
        providers,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/providers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Provider>>> {
    authorize(&user, Verb::Get, ResourceKind::Providers)?;

    let provider = find_provider(&state, id).await?;
    Ok(Json(Envelope::new(provider)))
}

/// POST /api/v1/providers
///
/// An admin's provider is active immediately; a coordinador's lands in
/// `pendiente` until an admin approves it.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProviderRequest>,
) -> AppResult<(StatusCode, Json<Envelope<Provider>>)> {
    authorize(&user, Verb::Post, ResourceKind::Providers)?;
    input.validate()?;
    check_provider_type(&state, input.provider_type_id).await?;

    let status = if user.role == Role::Admin {
        provider_status::ACTIVO
    } else {
        provider_status::PENDIENTE
    };

    let create_dto = CreateProvider {
        name: input.name,
        contact_email: input.contact_email,
        phone: input.phone,
        provider_type_id: input.provider_type_id,
    };

    let provider = ProviderRepo::create(&state.pool, &create_dto, status, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(provider))))
}

/// PUT /api/v1/providers/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProvider>,
) -> AppResult<Json<Envelope<Provider>>> {
    authorize(&user, Verb::Put, ResourceKind::Providers)?;

    if let Some(status) = &input.status {
        validate_provider_status(status)?;
    }
    if let Some(provider_type_id) = input.provider_type_id {
        check_provider_type(&state, provider_type_id).await?;
    }

    let provider = ProviderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id,
        }))?;
    Ok(Json(Envelope::new(provider)))
}

/// DELETE /api/v1/providers/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Providers)?;

    let provider = find_provider(&state, id).await?;
    scope.ensure_owns(provider.created_by, ResourceKind::Providers)?;

    match ProviderRepo::delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new("Provider deleted"))),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id,
        })),
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Provider is still referenced by {count} contract line item(s)"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_provider(state: &AppState, id: DbId) -> AppResult<Provider> {
    ProviderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id,
        }))
}

fn validate_provider_status(status: &str) -> Result<(), AppError> {
    if provider_status::is_valid(status) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "status: '{status}' is not one of {:?}",
            provider_status::ALL
        ))))
    }
}

async fn check_provider_type(state: &AppState, id: DbId) -> Result<(), AppError> {
    if CatalogRepo::PROVIDER_TYPES.exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "provider_type_id: no provider type with id {id}"
        ))))
    }
}
