//! Repository for the `resources` table.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::resource::{CreateResource, Resource, UpdateResource};
use crate::repositories::{ContractRepo, DeleteOutcome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, resource_type_id, quantity, created_by, \
    created_at, updated_at";

/// Provides CRUD operations for resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateResource,
        created_by: DbId,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (name, description, resource_type_id, quantity, created_by)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.resource_type_id)
            .bind(input.quantity)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a resource with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List resources by name with an optional type filter, returning the
    /// matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        resource_type_id: Option<DbId>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Resource>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let (rows, total) = match resource_type_id {
            Some(type_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM resources WHERE resource_type_id = $1
                     ORDER BY name LIMIT $2 OFFSET $3"
                );
                let rows = sqlx::query_as::<_, Resource>(&query)
                    .bind(type_id)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM resources WHERE resource_type_id = $1")
                        .bind(type_id)
                        .fetch_one(pool)
                        .await?;
                (rows, total.0)
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM resources ORDER BY name LIMIT $1 OFFSET $2"
                );
                let rows = sqlx::query_as::<_, Resource>(&query)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
                    .fetch_one(pool)
                    .await?;
                (rows, total.0)
            }
        };

        Ok((rows, total))
    }

    /// Update a resource. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateResource,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!(
            "UPDATE resources SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                resource_type_id = COALESCE($4, resource_type_id),
                quantity = COALESCE($5, quantity)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.resource_type_id)
            .bind(input.quantity)
            .fetch_optional(pool)
            .await
    }

    /// Delete a resource unless contract line items still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let refs = ContractRepo::count_item_references(pool, "resource", id).await?;
        if refs > 0 {
            return Ok(DeleteOutcome::Blocked(refs));
        }

        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
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
