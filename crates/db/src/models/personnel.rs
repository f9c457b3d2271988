//! Personnel (staff) model and DTOs.

use logievents_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full personnel row from the `personnel` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Personnel {
    pub id: DbId,
    pub full_name: String,
    pub document_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub personnel_type_id: DbId,
    pub hourly_rate: f64,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a personnel record.
#[derive(Debug, Deserialize)]
pub struct CreatePersonnel {
    pub full_name: String,
    pub document_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub personnel_type_id: DbId,
    pub hourly_rate: Option<f64>,
}

/// DTO for updating a personnel record. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonnel {
    pub full_name: Option<String>,
    pub document_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub personnel_type_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
}
