//! Shared model for the four type catalogs.
//!
//! `event_types`, `resource_types`, `provider_types`, and `personnel_types`
//! all carry the same columns, so one row struct and one pair of DTOs covers
//! them; [`crate::repositories::CatalogRepo`] selects the table.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from any of the type-catalog tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a catalog entry.
#[derive(Debug, Deserialize)]
pub struct CreateCatalogEntry {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a catalog entry. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCatalogEntry {
    pub name: Option<String>,
    pub description: Option<String>,
}
