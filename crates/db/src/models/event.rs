//! Event entity model and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: String,
    pub event_type_id: DbId,
    pub contract_id: Option<DbId>,
    pub responsable_id: DbId,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event. Status always starts at `planeacion`.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub event_type_id: DbId,
    pub contract_id: Option<DbId>,
    /// Defaults to the creating user when omitted.
    pub responsable_id: Option<DbId>,
}

/// DTO for updating an event. Status changes go through the dedicated
/// transition endpoint, not here.
#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub event_type_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub responsable_id: Option<DbId>,
}

/// Filters applied to event list queries.
#[derive(Debug, Default)]
pub struct EventFilter {
    pub status: Option<String>,
    pub event_type_id: Option<DbId>,
    /// Ownership narrowing: only events where this user is responsible.
    pub responsable_id: Option<DbId>,
}
