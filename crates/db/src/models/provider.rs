//! Provider (supplier) model and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full provider row from the `providers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Provider {
    pub id: DbId,
    pub name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub provider_type_id: DbId,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a provider.
///
/// The initial status is decided by the handler from the caller's role: an
/// admin's provider starts `activo`, a coordinador's starts `pendiente`.
#[derive(Debug, Deserialize)]
pub struct CreateProvider {
    pub name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub provider_type_id: DbId,
}

/// DTO for updating a provider. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProvider {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub provider_type_id: Option<DbId>,
    pub status: Option<String>,
}
