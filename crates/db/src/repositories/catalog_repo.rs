//! Parameterized repository for the four type-catalog tables.
//!
//! The catalogs differ only in table name and in which instance table
//! references them, so a single repository instance per catalog replaces
//! four copy-pasted ones.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::catalog::{CatalogEntry, CreateCatalogEntry, UpdateCatalogEntry};
use crate::repositories::DeleteOutcome;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// CRUD operations for one type-catalog table.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRepo {
    table: &'static str,
    /// Entity name used in `NotFound` errors.
    pub entity: &'static str,
    /// Instance table that foreign-keys into this catalog.
    ref_table: &'static str,
    ref_column: &'static str,
}

impl CatalogRepo {
    pub const EVENT_TYPES: CatalogRepo = CatalogRepo {
        table: "event_types",
        entity: "EventType",
        ref_table: "events",
        ref_column: "event_type_id",
    };

    pub const RESOURCE_TYPES: CatalogRepo = CatalogRepo {
        table: "resource_types",
        entity: "ResourceType",
        ref_table: "resources",
        ref_column: "resource_type_id",
    };

    pub const PROVIDER_TYPES: CatalogRepo = CatalogRepo {
        table: "provider_types",
        entity: "ProviderType",
        ref_table: "providers",
        ref_column: "provider_type_id",
    };

    pub const PERSONNEL_TYPES: CatalogRepo = CatalogRepo {
        table: "personnel_types",
        entity: "PersonnelType",
        ref_table: "personnel",
        ref_column: "personnel_type_id",
    };

    /// Insert a new catalog entry, returning the created row.
    pub async fn create(
        &self,
        pool: &PgPool,
        input: &CreateCatalogEntry,
    ) -> Result<CatalogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}",
            table = self.table
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a catalog entry by internal ID.
    pub async fn find_by_id(
        &self,
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1", table = self.table);
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an entry with the given id exists. Used for referential
    /// checks before writes into the instance tables.
    pub async fn exists(&self, pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {table} WHERE id = $1", table = self.table);
        let count: (i64,) = sqlx::query_as(&query).bind(id).fetch_one(pool).await?;
        Ok(count.0 > 0)
    }

    /// List catalog entries ordered by name, with the total row count.
    pub async fn list(
        &self,
        pool: &PgPool,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<CatalogEntry>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let query = format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY name LIMIT $1 OFFSET $2",
            table = self.table
        );
        let rows = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(limit)
            .bind(offset(page, limit))
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM {table}", table = self.table);
        let total: (i64,) = sqlx::query_as(&count_query).fetch_one(pool).await?;

        Ok((rows, total.0))
    }

    /// Update a catalog entry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        &self,
        pool: &PgPool,
        id: DbId,
        input: &UpdateCatalogEntry,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}",
            table = self.table
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a catalog entry unless instances still reference it.
    ///
    /// The reference check and the delete are separate statements; the
    /// `ON DELETE RESTRICT` foreign key backs the narrow window between them.
    pub async fn delete(&self, pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let ref_query = format!(
            "SELECT COUNT(*) FROM {ref_table} WHERE {ref_column} = $1",
            ref_table = self.ref_table,
            ref_column = self.ref_column
        );
        let refs: (i64,) = sqlx::query_as(&ref_query).bind(id).fetch_one(pool).await?;
        if refs.0 > 0 {
            return Ok(DeleteOutcome::Blocked(refs.0));
        }

        let query = format!("DELETE FROM {table} WHERE id = $1", table = self.table);
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
