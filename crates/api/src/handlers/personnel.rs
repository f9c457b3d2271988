//! Handlers for the `/personnel` resource (staff records).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::types::DbId;

use logievents_db::models::personnel::{CreatePersonnel, Personnel, UpdatePersonnel};
use logievents_db::repositories::{CatalogRepo, DeleteOutcome, PersonnelRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

/// Query parameters for `GET /personnel`.
#[derive(Debug, Deserialize)]
pub struct PersonnelListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub personnel_type_id: Option<DbId>,
}

/// Request body for `POST /personnel`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonnelRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub document_number: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub personnel_type_id: DbId,
    pub hourly_rate: Option<f64>,
}

/// GET /api/v1/personnel
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PersonnelListParams>,
) -> AppResult<Json<PagedEnvelope<Personnel>>> {
    authorize(&user, Verb::Get, ResourceKind::Personnel)?;

    let (personnel, total) = PersonnelRepo::list(
        &state.pool,
        params.personnel_type_id,
        params.page,
        params.limit,
    )
    .await?;
    Ok(Json(PagedEnvelope::new(
        personnel,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/personnel/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Personnel>>> {
    authorize(&user, Verb::Get, ResourceKind::Personnel)?;

    let person = find_personnel(&state, id).await?;
    Ok(Json(Envelope::new(person)))
}

/// POST /api/v1/personnel
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePersonnelRequest>,
) -> AppResult<(StatusCode, Json<Envelope<Personnel>>)> {
    authorize(&user, Verb::Post, ResourceKind::Personnel)?;
    input.validate()?;
    validate_hourly_rate(input.hourly_rate)?;
    check_personnel_type(&state, input.personnel_type_id).await?;

    let create_dto = CreatePersonnel {
        full_name: input.full_name,
        document_number: input.document_number,
        email: input.email,
        phone: input.phone,
        personnel_type_id: input.personnel_type_id,
        hourly_rate: input.hourly_rate,
    };

    let person = PersonnelRepo::create(&state.pool, &create_dto, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(person))))
}

/// PUT /api/v1/personnel/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePersonnel>,
) -> AppResult<Json<Envelope<Personnel>>> {
    authorize(&user, Verb::Put, ResourceKind::Personnel)?;

    validate_hourly_rate(input.hourly_rate)?;
    if let Some(personnel_type_id) = input.personnel_type_id {
        check_personnel_type(&state, personnel_type_id).await?;
    }

    let person = PersonnelRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Personnel",
            id,
        }))?;
    Ok(Json(Envelope::new(person)))
}

/// DELETE /api/v1/personnel/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Personnel)?;

    let person = find_personnel(&state, id).await?;
    scope.ensure_owns(person.created_by, ResourceKind::Personnel)?;

    match PersonnelRepo::delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new("Personnel record deleted"))),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Personnel",
            id,
        })),
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Personnel record is still referenced by {count} contract line item(s)"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_personnel(state: &AppState, id: DbId) -> AppResult<Personnel> {
    PersonnelRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Personnel",
            id,
        }))
}

fn validate_hourly_rate(rate: Option<f64>) -> Result<(), AppError> {
    if let Some(rate) = rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "hourly_rate: must be a non-negative number".into(),
            )));
        }
    }
    Ok(())
}

async fn check_personnel_type(state: &AppState, id: DbId) -> Result<(), AppError> {
    if CatalogRepo::PERSONNEL_TYPES.exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "personnel_type_id: no personnel type with id {id}"
        ))))
    }
}
