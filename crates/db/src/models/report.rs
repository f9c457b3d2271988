//! Incident/status report model and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full report row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub status: String,
    pub event_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a report. At least one of `event_id` / `contract_id`
/// must be set; status always starts at `pendiente`.
#[derive(Debug, Deserialize)]
pub struct CreateReport {
    pub title: String,
    pub body: String,
    pub event_id: Option<DbId>,
    pub contract_id: Option<DbId>,
}

/// DTO for updating a report's text. Status changes go through the
/// dedicated transition endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateReport {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Filters applied to report list queries.
#[derive(Debug, Default)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub event_id: Option<DbId>,
    pub contract_id: Option<DbId>,
}
