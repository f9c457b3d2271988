//! Handlers for the `/stats` aggregation endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use logievents_db::repositories::stats_repo::{EntityCounts, StatusCount};
use logievents_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

/// Payload for `GET /stats/overview`.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub events_by_status: Vec<StatusCount>,
    pub contracts_by_status: Vec<StatusCount>,
    pub reports_by_status: Vec<StatusCount>,
    pub totals: EntityCounts,
    /// Sum of budgets across contracts currently in `activo`.
    pub active_contract_budget: f64,
}

/// GET /api/v1/stats/overview
///
/// Status counts and derived totals across the main entities. Available to
/// any authenticated user.
pub async fn overview(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Envelope<OverviewResponse>>> {
    let events_by_status = StatsRepo::events_by_status(&state.pool).await?;
    let contracts_by_status = StatsRepo::contracts_by_status(&state.pool).await?;
    let reports_by_status = StatsRepo::reports_by_status(&state.pool).await?;
    let totals = StatsRepo::entity_counts(&state.pool).await?;
    let active_contract_budget = StatsRepo::active_contract_budget(&state.pool).await?;

    Ok(Json(Envelope::new(OverviewResponse {
        events_by_status,
        contracts_by_status,
        reports_by_status,
        totals,
        active_contract_budget,
    })))
}
