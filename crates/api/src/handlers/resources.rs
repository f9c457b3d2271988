//! Handlers for the `/resources` resource (physical/logistics assets).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::types::DbId;

use logievents_db::models::resource::{CreateResource, Resource, UpdateResource};
use logievents_db::repositories::{CatalogRepo, DeleteOutcome, ResourceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

/// Query parameters for `GET /resources`.
#[derive(Debug, Deserialize)]
pub struct ResourceListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub resource_type_id: Option<DbId>,
}

/// GET /api/v1/resources
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ResourceListParams>,
) -> AppResult<Json<PagedEnvelope<Resource>>> {
    authorize(&user, Verb::Get, ResourceKind::Resources)?;

    let (resources, total) = ResourceRepo::list(
        &state.pool,
        params.resource_type_id,
        params.page,
        params.limit,
    )
    .await?;
    Ok(Json(PagedEnvelope::new(
        resources,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/resources/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Resource>>> {
    authorize(&user, Verb::Get, ResourceKind::Resources)?;

    let resource = ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;
    Ok(Json(Envelope::new(resource)))
}

/// POST /api/v1/resources
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateResource>,
) -> AppResult<(StatusCode, Json<Envelope<Resource>>)> {
    authorize(&user, Verb::Post, ResourceKind::Resources)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name: must not be empty".into(),
        )));
    }
    if let Some(quantity) = input.quantity {
        if quantity < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "quantity: must not be negative".into(),
            )));
        }
    }
    check_resource_type(&state, input.resource_type_id).await?;

    let resource = ResourceRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(resource))))
}

/// PUT /api/v1/resources/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateResource>,
) -> AppResult<Json<Envelope<Resource>>> {
    authorize(&user, Verb::Put, ResourceKind::Resources)?;

    if let Some(resource_type_id) = input.resource_type_id {
        check_resource_type(&state, resource_type_id).await?;
    }
    if let Some(quantity) = input.quantity {
        if quantity < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "quantity: must not be negative".into(),
            )));
        }
    }

    let resource = ResourceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;
    Ok(Json(Envelope::new(resource)))
}

/// DELETE /api/v1/resources/{id}
///
/// A coordinador may only delete resources it created; deletion is blocked
/// while contract line items still reference the resource.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Resources)?;

    let resource = ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;
    scope.ensure_owns(resource.created_by, ResourceKind::Resources)?;

    match ResourceRepo::delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new("Resource deleted"))),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        })),
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Resource is still referenced by {count} contract line item(s)"
        )))),
    }
}

async fn check_resource_type(state: &AppState, id: DbId) -> Result<(), AppError> {
    if CatalogRepo::RESOURCE_TYPES.exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "resource_type_id: no resource type with id {id}"
        ))))
    }
}
