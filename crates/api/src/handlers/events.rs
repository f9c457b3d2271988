//! Handlers for the `/events` resource.
//!
//! Events carry the one real invariant in the domain: the time window must
//! be positive (`ends_at > starts_at`). The check lives in
//! [`validate_window`] and runs on create and on any update that touches
//! either bound, so no code path can skip it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::roles::Role;
use logievents_core::status::{EventStatus, LIDER_EVENT_TARGETS};
use logievents_core::types::{DbId, Timestamp};

use logievents_db::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use logievents_db::repositories::{
    CatalogRepo, ContractRepo, DeleteOutcome, EventRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /events`.
#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub event_type_id: Option<DbId>,
}

/// Request body for `PATCH /events/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct EventStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/events
///
/// A lider's listing is narrowed to events where they are the responsible
/// user; other roles see everything.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<PagedEnvelope<Event>>> {
    let scope = authorize(&user, Verb::Get, ResourceKind::Events)?;

    if let Some(status) = &params.status {
        parse_status(status)?;
    }

    let filter = EventFilter {
        status: params.status,
        event_type_id: params.event_type_id,
        responsable_id: scope.owner_only,
    };
    let (events, total) = EventRepo::list(&state.pool, &filter, params.page, params.limit).await?;
    Ok(Json(PagedEnvelope::new(
        events,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Event>>> {
    let scope = authorize(&user, Verb::Get, ResourceKind::Events)?;

    let event = find_event(&state, id).await?;
    scope.ensure_owns(event.responsable_id, ResourceKind::Events)?;
    Ok(Json(Envelope::new(event)))
}

/// POST /api/v1/events
///
/// Validates the time window and the referential existence of the event
/// type, contract, and responsible user before the insert.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Envelope<Event>>)> {
    authorize(&user, Verb::Post, ResourceKind::Events)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name: must not be empty".into(),
        )));
    }
    validate_window(input.starts_at, input.ends_at)?;
    check_event_type(&state, input.event_type_id).await?;
    if let Some(contract_id) = input.contract_id {
        check_contract(&state, contract_id).await?;
    }

    let responsable_id = input.responsable_id.unwrap_or(user.user_id);
    if !UserRepo::exists_active(&state.pool, responsable_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "responsable_id: no active user with id {responsable_id}"
        ))));
    }

    let event = EventRepo::create(&state.pool, &input, responsable_id, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(event))))
}

/// PUT /api/v1/events/{id}
///
/// Re-validates the time window against the merged (existing + incoming)
/// bounds and any foreign key that is being changed.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<Envelope<Event>>> {
    authorize(&user, Verb::Put, ResourceKind::Events)?;

    let current = find_event(&state, id).await?;

    let starts_at = input.starts_at.unwrap_or(current.starts_at);
    let ends_at = input.ends_at.unwrap_or(current.ends_at);
    validate_window(starts_at, ends_at)?;

    if let Some(event_type_id) = input.event_type_id {
        check_event_type(&state, event_type_id).await?;
    }
    if let Some(contract_id) = input.contract_id {
        check_contract(&state, contract_id).await?;
    }
    if let Some(responsable_id) = input.responsable_id {
        if !UserRepo::exists_active(&state.pool, responsable_id).await? {
            return Err(AppError::Core(CoreError::Validation(format!(
                "responsable_id: no active user with id {responsable_id}"
            ))));
        }
    }

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;
    Ok(Json(Envelope::new(event)))
}

/// PATCH /api/v1/events/{id}/status
///
/// Walks the event workflow. A lider may only move its own events, and only
/// into `en_curso` or `completado`.
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<EventStatusRequest>,
) -> AppResult<Json<Envelope<Event>>> {
    let scope = authorize(&user, Verb::Patch, ResourceKind::Events)?;

    let event = find_event(&state, id).await?;
    scope.ensure_owns(event.responsable_id, ResourceKind::Events)?;

    let current = parse_status(&event.status)?;
    let target = parse_status(&input.status)?;

    if user.role == Role::Lider && !LIDER_EVENT_TARGETS.contains(&target) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role 'lider' may only move an event to {:?}",
            LIDER_EVENT_TARGETS
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
        ))));
    }

    if !current.can_transition_to(target) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot transition event from '{}' to '{}'",
            current.as_str(),
            target.as_str()
        ))));
    }

    let event = EventRepo::set_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;
    Ok(Json(Envelope::new(event)))
}

/// DELETE /api/v1/events/{id}
///
/// A coordinador may only delete events it created; deletion is blocked
/// while reports still reference the event.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Events)?;

    let event = find_event(&state, id).await?;
    scope.ensure_owns(event.created_by, ResourceKind::Events)?;

    match EventRepo::delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new("Event deleted"))),
        DeleteOutcome::NotFound => {
            Err(AppError::Core(CoreError::NotFound { entity: "Event", id }))
        }
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Event is still referenced by {count} report(s)"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_event(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))
}

/// The event time window must be strictly positive.
fn validate_window(starts_at: Timestamp, ends_at: Timestamp) -> Result<(), AppError> {
    if ends_at <= starts_at {
        return Err(AppError::Core(CoreError::Validation(
            "ends_at: must be after starts_at".into(),
        )));
    }
    Ok(())
}

fn parse_status(s: &str) -> Result<EventStatus, AppError> {
    EventStatus::parse(s).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "status: '{s}' is not a valid event status"
        )))
    })
}

async fn check_event_type(state: &AppState, id: DbId) -> Result<(), AppError> {
    if CatalogRepo::EVENT_TYPES.exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "event_type_id: no event type with id {id}"
        ))))
    }
}

async fn check_contract(state: &AppState, id: DbId) -> Result<(), AppError> {
    if ContractRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "contract_id: no contract with id {id}"
        ))))
    }
}
