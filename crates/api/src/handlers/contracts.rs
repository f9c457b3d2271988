//! Handlers for the `/contracts` resource and its embedded line items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use logievents_core::error::CoreError;
use logievents_core::pagination::{clamp_limit, clamp_page};
use logievents_core::policy::{ResourceKind, Verb};
use logievents_core::status::ContractStatus;
use logievents_core::types::{DbId, Timestamp};

use logievents_db::models::contract::{
    Contract, ContractFilter, ContractItem, CreateContract, CreateContractItem, UpdateContract,
};
use logievents_db::repositories::{
    ContractRepo, DeleteOutcome, PersonnelRepo, ProviderRepo, ResourceRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::policy::authorize;
use crate::response::{Envelope, MessageEnvelope, PagedEnvelope};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /contracts`.
#[derive(Debug, Deserialize)]
pub struct ContractListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// Request body for `POST /contracts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContractRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub client_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub client_email: String,
    pub client_phone: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub budget: Option<f64>,
}

/// Request body for `PATCH /contracts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ContractStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Contract handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ContractListParams>,
) -> AppResult<Json<PagedEnvelope<Contract>>> {
    authorize(&user, Verb::Get, ResourceKind::Contracts)?;

    if let Some(status) = &params.status {
        parse_status(status)?;
    }

    let filter = ContractFilter {
        status: params.status,
        created_by: None,
    };
    let (contracts, total) =
        ContractRepo::list(&state.pool, &filter, params.page, params.limit).await?;
    Ok(Json(PagedEnvelope::new(
        contracts,
        total,
        clamp_page(params.page),
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Contract>>> {
    authorize(&user, Verb::Get, ResourceKind::Contracts)?;
    let contract = find_contract(&state, id).await?;
    Ok(Json(Envelope::new(contract)))
}

/// POST /api/v1/contracts
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateContractRequest>,
) -> AppResult<(StatusCode, Json<Envelope<Contract>>)> {
    authorize(&user, Verb::Post, ResourceKind::Contracts)?;
    input.validate()?;
    validate_window(input.starts_at, input.ends_at)?;
    if let Some(budget) = input.budget {
        validate_budget(budget)?;
    }

    let create_dto = CreateContract {
        client_name: input.client_name,
        client_email: input.client_email,
        client_phone: input.client_phone,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        budget: input.budget,
    };

    let contract = ContractRepo::create(&state.pool, &create_dto, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(contract))))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<Envelope<Contract>>> {
    authorize(&user, Verb::Put, ResourceKind::Contracts)?;

    let current = find_contract(&state, id).await?;

    let starts_at = input.starts_at.unwrap_or(current.starts_at);
    let ends_at = input.ends_at.unwrap_or(current.ends_at);
    validate_window(starts_at, ends_at)?;
    if let Some(budget) = input.budget {
        validate_budget(budget)?;
    }

    let contract = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;
    Ok(Json(Envelope::new(contract)))
}

/// PATCH /api/v1/contracts/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ContractStatusRequest>,
) -> AppResult<Json<Envelope<Contract>>> {
    authorize(&user, Verb::Patch, ResourceKind::Contracts)?;

    let contract = find_contract(&state, id).await?;
    let current = parse_status(&contract.status)?;
    let target = parse_status(&input.status)?;

    if !current.can_transition_to(target) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot transition contract from '{}' to '{}'",
            current.as_str(),
            target.as_str()
        ))));
    }

    let contract = ContractRepo::set_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;
    Ok(Json(Envelope::new(contract)))
}

/// DELETE /api/v1/contracts/{id}
///
/// A coordinador may only delete contracts it created; deletion is blocked
/// while events or reports still reference the contract.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Contracts)?;

    let contract = find_contract(&state, id).await?;
    scope.ensure_owns(contract.created_by, ResourceKind::Contracts)?;

    match ContractRepo::delete(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageEnvelope::new("Contract deleted"))),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        })),
        DeleteOutcome::Blocked(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Contract is still referenced by {count} record(s)"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Line item handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts/{id}/items
pub async fn list_items(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Vec<ContractItem>>>> {
    authorize(&user, Verb::Get, ResourceKind::Contracts)?;
    find_contract(&state, id).await?;

    let items = ContractRepo::list_items(&state.pool, id).await?;
    Ok(Json(Envelope::new(items)))
}

/// POST /api/v1/contracts/{id}/items
///
/// The referenced resource / provider / personnel record must exist at the
/// time of the check; the check and the insert are separate statements.
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateContractItem>,
) -> AppResult<(StatusCode, Json<Envelope<ContractItem>>)> {
    authorize(&user, Verb::Post, ResourceKind::Contracts)?;
    find_contract(&state, id).await?;

    if let Some(quantity) = input.quantity {
        if quantity <= 0 {
            return Err(AppError::Core(CoreError::Validation(
                "quantity: must be positive".into(),
            )));
        }
    }
    check_item_reference(&state, &input.item_kind, input.item_id).await?;

    let item = ContractRepo::add_item(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(item))))
}

/// DELETE /api/v1/contracts/{id}/items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageEnvelope>> {
    let scope = authorize(&user, Verb::Delete, ResourceKind::Contracts)?;

    let contract = find_contract(&state, id).await?;
    scope.ensure_owns(contract.created_by, ResourceKind::Contracts)?;

    let removed = ContractRepo::delete_item(&state.pool, id, item_id).await?;
    if removed {
        Ok(Json(MessageEnvelope::new("Line item removed")))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ContractItem",
            id: item_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_contract(state: &AppState, id: DbId) -> AppResult<Contract> {
    ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))
}

/// The contract time window must be strictly positive.
fn validate_window(starts_at: Timestamp, ends_at: Timestamp) -> Result<(), AppError> {
    if ends_at <= starts_at {
        return Err(AppError::Core(CoreError::Validation(
            "ends_at: must be after starts_at".into(),
        )));
    }
    Ok(())
}

fn validate_budget(budget: f64) -> Result<(), AppError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "budget: must be a non-negative number".into(),
        )));
    }
    Ok(())
}

fn parse_status(s: &str) -> Result<ContractStatus, AppError> {
    ContractStatus::parse(s).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "status: '{s}' is not a valid contract status"
        )))
    })
}

/// Verify a line item's `(item_kind, item_id)` pair resolves to a live row.
async fn check_item_reference(
    state: &AppState,
    item_kind: &str,
    item_id: DbId,
) -> Result<(), AppError> {
    let exists = match item_kind {
        "resource" => ResourceRepo::exists(&state.pool, item_id).await?,
        "provider" => ProviderRepo::exists(&state.pool, item_id).await?,
        "personnel" => PersonnelRepo::exists(&state.pool, item_id).await?,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "item_kind: '{other}' is not one of resource, provider, personnel"
            ))))
        }
    };
    if exists {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "item_id: no {item_kind} with id {item_id}"
        ))))
    }
}
