//! Resource (physical/logistics asset) model and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full resource row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resource {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub resource_type_id: DbId,
    pub quantity: i32,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a resource.
#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub name: String,
    pub description: Option<String>,
    pub resource_type_id: DbId,
    pub quantity: Option<i32>,
}

/// DTO for updating a resource. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateResource {
    pub name: Option<String>,
    pub description: Option<String>,
    pub resource_type_id: Option<DbId>,
    pub quantity: Option<i32>,
}
