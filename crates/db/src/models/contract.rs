//! Contract entity model, line items, and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full contract row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub budget: f64,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A line item on a contract, referencing a resource, provider, or
/// personnel record by kind + id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractItem {
    pub id: DbId,
    pub contract_id: DbId,
    pub item_kind: String,
    pub item_id: DbId,
    pub quantity: i32,
    pub unit_cost: f64,
    pub hours: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a contract. Status always starts at `borrador`.
#[derive(Debug, Deserialize)]
pub struct CreateContract {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub budget: Option<f64>,
}

/// DTO for updating a contract. Status changes go through the dedicated
/// transition endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateContract {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub budget: Option<f64>,
}

/// DTO for adding a line item to a contract.
#[derive(Debug, Deserialize)]
pub struct CreateContractItem {
    pub item_kind: String,
    pub item_id: DbId,
    pub quantity: Option<i32>,
    pub unit_cost: Option<f64>,
    pub hours: Option<f64>,
}

/// Filters applied to contract list queries.
#[derive(Debug, Default)]
pub struct ContractFilter {
    pub status: Option<String>,
    pub created_by: Option<DbId>,
}
