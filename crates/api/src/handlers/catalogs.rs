//! Shared handlers for the four type-catalog resources.
//!
//! The catalogs are identical in shape, so one set of handlers serves all
//! of them; [`crate::routes::catalogs::router`] binds each instance to its
//! [`CatalogRepo`] and [`ResourceKind`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::types::DbId;

use logievents_db::models::catalog::{CatalogEntry, CreateCatalogEntry, UpdateCatalogEntry};
use logievents_db::repositories::{CatalogRepo, DeleteOutcome};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;
use crate::PaginationParams;

/// GET /api/v1/<catalog>
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
    repo: &'static CatalogRepo,
    kind: ResourceKind,
) -> AppResult<Json<PagedEnvelope<CatalogEntry>>> {
    authorize(&user, Verb::Get, kind)?;

    let (entries, total) = repo.list(&state.pool, params.page, params.limit).await?;
    Ok(Json(PagedEnvelope::new(
        entries,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/<catalog>/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    repo: &'static CatalogRepo,
    kind: ResourceKind,
) -> AppResult<Json<Envelope<CatalogEntry>>> {
    authorize(&user, Verb::Get, kind)?;

    let entry = repo
        .find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: repo.entity,
            id,
        }))?;
    Ok(Json(Envelope::new(entry)))
}

/// POST /api/v1/<catalog>
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCatalogEntry>,
    repo: &'static CatalogRepo,
    kind: ResourceKind,
) -> AppResult<(StatusCode, Json<Envelope<CatalogEntry>>)> {
    authorize(&user, Verb::Post, kind)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name: must not be empty".into(),
        )));
    }

    let entry = repo.create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(entry))))
}

/// PUT /api/v1/<catalog>/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCatalogEntry>,
    repo: &'static CatalogRepo,
    kind: ResourceKind,
) -> AppResult<Json<Envelope<CatalogEntry>>> {
    authorize(&user, Verb::Put, kind)?;

    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "name: must not be empty".into(),
            )));
        }
    }

    let entry = repo
        .update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: repo.entity,
            id,
        }))?;
    Ok(Json(Envelope::new(entry)))
}

/// DELETE /api/v1/<catalog>/{id}
///
/// Blocked while instances still foreign-key into the entry.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    repo: &'static CatalogRepo,
    kind: ResourceKind,
) -> AppResult<Json<MessageEnvelope>> {
    authorize(&user, Verb::Delete, kind)?;

    match repo.delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new(format!(
            "{} deleted",
            repo.entity
        )))),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: repo.entity,
            id,
        })),
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "{} is still referenced by {count} record(s)",
            repo.entity
        )))),
    }
}
