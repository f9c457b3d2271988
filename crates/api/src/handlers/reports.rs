//! Handlers for the `/reports` resource (incident / status records).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::status::ReportStatus;
use logievents_core::types::DbId;

use logievents_db::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use logievents_db::repositories::{ContractRepo, EventRepo, ReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

/// Query parameters for `GET /reports`.
#[derive(Debug, Deserialize)]
pub struct ReportListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub event_id: Option<DbId>,
    pub contract_id: Option<DbId>,
}

/// Request body for `PATCH /reports/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ReportStatusRequest {
    pub status: String,
}

/// GET /api/v1/reports
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ReportListParams>,
) -> AppResult<Json<PagedEnvelope<Report>>> {
    authorize(&user, Verb::Get, ResourceKind::Reports)?;

    if let Some(status) = &params.status {
        parse_status(status)?;
    }

    let filter = ReportFilter {
        status: params.status,
        event_id: params.event_id,
        contract_id: params.contract_id,
    };
    let (reports, total) =
        ReportRepo::list(&state.pool, &filter, params.page, params.limit).await?;
    Ok(Json(PagedEnvelope::new(
        reports,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Report>>> {
    authorize(&user, Verb::Get, ResourceKind::Reports)?;

    let report = find_report(&state, id).await?;
    Ok(Json(Envelope::new(report)))
}

/// POST /api/v1/reports
///
/// A report must point at an existing event or contract (or both).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<Envelope<Report>>)> {
    authorize(&user, Verb::Post, ResourceKind::Reports)?;

    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title: must not be empty".into(),
        )));
    }
    if input.event_id.is_none() && input.contract_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "event_id / contract_id: a report must reference an event or a contract".into(),
        )));
    }
    if let Some(event_id) = input.event_id {
        if !EventRepo::exists(&state.pool, event_id).await? {
            return Err(AppError::Core(CoreError::Validation(format!(
                "event_id: no event with id {event_id}"
            ))));
        }
    }
    if let Some(contract_id) = input.contract_id {
        if !ContractRepo::exists(&state.pool, contract_id).await? {
            return Err(AppError::Core(CoreError::Validation(format!(
                "contract_id: no contract with id {contract_id}"
            ))));
        }
    }

    let report = ReportRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(report))))
}

/// PUT /api/v1/reports/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReport>,
) -> AppResult<Json<Envelope<Report>>> {
    authorize(&user, Verb::Put, ResourceKind::Reports)?;

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "title: must not be empty".into(),
            )));
        }
    }

    let report = ReportRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(Envelope::new(report)))
}

/// PATCH /api/v1/reports/{id}/status
///
/// The report workflow is strictly linear:
/// pendiente -> en_progreso -> resuelto -> archivado.
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReportStatusRequest>,
) -> AppResult<Json<Envelope<Report>>> {
    authorize(&user, Verb::Patch, ResourceKind::Reports)?;

    let report = find_report(&state, id).await?;
    let current = parse_status(&report.status)?;
    let target = parse_status(&input.status)?;

    if !current.can_transition_to(target) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot transition report from '{}' to '{}'",
            current.as_str(),
            target.as_str()
        ))));
    }

    let report = ReportRepo::set_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(Envelope::new(report)))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Reports)?;

    let report = find_report(&state, id).await?;
    scope.ensure_owns(report.created_by, ResourceKind::Reports)?;

    let removed = ReportRepo::delete(&state.pool, id).await?;
    if removed {
        Ok(Json(MessageEnvelope::new("Report deleted")))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_report(state: &AppState, id: DbId) -> AppResult<Report> {
    ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
}

fn parse_status(s: &str) -> Result<ReportStatus, AppError> {
    ReportStatus::parse(s).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "status: '{s}' is not a valid report status"
        )))
    })
}
