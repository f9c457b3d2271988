//! Repository for the `providers` table.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::provider::{CreateProvider, Provider, UpdateProvider};
use crate::repositories::{ContractRepo, DeleteOutcome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, contact_email, phone, provider_type_id, status, created_by, \
    created_at, updated_at";

/// Provides CRUD operations for providers.
pub struct ProviderRepo;

impl ProviderRepo {
    /// Insert a new provider, returning the created row.
    ///
    /// `status` is decided by the handler from the caller's role.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProvider,
        status: &str,
        created_by: DbId,
    ) -> Result<Provider, sqlx::Error> {
        let query = format!(
            "INSERT INTO providers (name, contact_email, phone, provider_type_id, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(input.provider_type_id)
            .bind(status)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a provider by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM providers WHERE id = $1");
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a provider with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM providers WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List providers by name with an optional status filter, returning the
    /// matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Provider>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let (rows, total) = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM providers WHERE status = $1
                     ORDER BY name LIMIT $2 OFFSET $3"
                );
                let rows = sqlx::query_as::<_, Provider>(&query)
                    .bind(status)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM providers WHERE status = $1")
                        .bind(status)
                        .fetch_one(pool)
                        .await?;
                (rows, total.0)
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM providers ORDER BY name LIMIT $1 OFFSET $2"
                );
                let rows = sqlx::query_as::<_, Provider>(&query)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM providers")
                    .fetch_one(pool)
                    .await?;
                (rows, total.0)
            }
        };

        Ok((rows, total))
    }

    /// Update a provider. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProvider,
    ) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!(
            "UPDATE providers SET
                name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email),
                phone = COALESCE($4, phone),
                provider_type_id = COALESCE($5, provider_type_id),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(input.provider_type_id)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a provider unless contract line items still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let refs = ContractRepo::count_item_references(pool, "provider", id).await?;
        if refs > 0 {
            return Ok(DeleteOutcome::Blocked(refs));
        }

        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
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
