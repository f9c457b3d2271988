//! Repository for the `personnel` table.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::personnel::{CreatePersonnel, Personnel, UpdatePersonnel};
use crate::repositories::{ContractRepo, DeleteOutcome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, document_number, email, phone, personnel_type_id, \
    hourly_rate, created_by, created_at, updated_at";

/// Provides CRUD operations for personnel.
pub struct PersonnelRepo;

impl PersonnelRepo {
    /// Insert a new personnel record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePersonnel,
        created_by: DbId,
    ) -> Result<Personnel, sqlx::Error> {
        let query = format!(
            "INSERT INTO personnel
                (full_name, document_number, email, phone, personnel_type_id, hourly_rate, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Personnel>(&query)
            .bind(&input.full_name)
            .bind(&input.document_number)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.personnel_type_id)
            .bind(input.hourly_rate)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a personnel record by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Personnel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM personnel WHERE id = $1");
        sqlx::query_as::<_, Personnel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a personnel record with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM personnel WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List personnel by name with an optional type filter, returning the
    /// matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        personnel_type_id: Option<DbId>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Personnel>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let (rows, total) = match personnel_type_id {
            Some(type_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM personnel WHERE personnel_type_id = $1
                     ORDER BY full_name LIMIT $2 OFFSET $3"
                );
                let rows = sqlx::query_as::<_, Personnel>(&query)
                    .bind(type_id)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM personnel WHERE personnel_type_id = $1")
                        .bind(type_id)
                        .fetch_one(pool)
                        .await?;
                (rows, total.0)
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM personnel ORDER BY full_name LIMIT $1 OFFSET $2"
                );
                let rows = sqlx::query_as::<_, Personnel>(&query)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM personnel")
                    .fetch_one(pool)
                    .await?;
                (rows, total.0)
            }
        };

        Ok((rows, total))
    }

    /// Update a personnel record. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePersonnel,
    ) -> Result<Option<Personnel>, sqlx::Error> {
        let query = format!(
            "UPDATE personnel SET
                full_name = COALESCE($2, full_name),
                document_number = COALESCE($3, document_number),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                personnel_type_id = COALESCE($6, personnel_type_id),
                hourly_rate = COALESCE($7, hourly_rate)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Personnel>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.document_number)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.personnel_type_id)
            .bind(input.hourly_rate)
            .fetch_optional(pool)
            .await
    }

    /// Delete a personnel record unless contract line items still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let refs = ContractRepo::count_item_references(pool, "personnel", id).await?;
        if refs > 0 {
            return Ok(DeleteOutcome::Blocked(refs));
        }

        let result = sqlx::query("DELETE FROM personnel WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
