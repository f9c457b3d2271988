//! Repository for the `contracts` and `contract_items` tables.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::contract::{
    Contract, ContractFilter, ContractItem, CreateContract, CreateContractItem, UpdateContract,
};
use crate::repositories::DeleteOutcome;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_name, client_email, client_phone, starts_at, ends_at, \
    budget, status, created_by, created_at, updated_at";

/// Column list for contract line items.
const ITEM_COLUMNS: &str =
    "id, contract_id, item_kind, item_id, quantity, unit_cost, hours, created_at, updated_at";

/// Provides CRUD operations for contracts and their line items.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContract,
        created_by: DbId,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (client_name, client_email, client_phone, starts_at, ends_at, budget, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.budget)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a contract by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a contract with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List contracts newest-first with optional filters, returning the
    /// matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &ContractFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Contract>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.created_by.is_some() {
            conditions.push(format!("created_by = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM contracts {where_clause}
             ORDER BY created_at DESC
             LIMIT ${p1} OFFSET ${p2}",
            p1 = param_idx,
            p2 = param_idx + 1
        );
        let mut rows = sqlx::query_as::<_, Contract>(&query);
        if let Some(status) = &filter.status {
            rows = rows.bind(status);
        }
        if let Some(owner) = filter.created_by {
            rows = rows.bind(owner);
        }
        let rows = rows.bind(limit).bind(offset(page, limit)).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM contracts {where_clause}");
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(status) = &filter.status {
            count = count.bind(status);
        }
        if let Some(owner) = filter.created_by {
            count = count.bind(owner);
        }
        let total = count.fetch_one(pool).await?;

        Ok((rows, total.0))
    }

    /// Update a contract. Only non-`None` fields in `input` are applied;
    /// status is never touched here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                client_name = COALESCE($2, client_name),
                client_email = COALESCE($3, client_email),
                client_phone = COALESCE($4, client_phone),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                budget = COALESCE($7, budget)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.budget)
            .fetch_optional(pool)
            .await
    }

    /// Set a contract's status. Transition legality is checked by the caller.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("UPDATE contracts SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contract unless events or reports still reference it.
    /// Line items go with it (cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let refs: (i64,) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM events WHERE contract_id = $1)
                  + (SELECT COUNT(*) FROM reports WHERE contract_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        if refs.0 > 0 {
            return Ok(DeleteOutcome::Blocked(refs.0));
        }

        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    // -----------------------------------------------------------------------
    // Line items
    // -----------------------------------------------------------------------

    /// Add a line item to a contract, returning the created row.
    ///
    /// Referential existence of `(item_kind, item_id)` is validated by the
    /// caller before this write.
    pub async fn add_item(
        pool: &PgPool,
        contract_id: DbId,
        input: &CreateContractItem,
    ) -> Result<ContractItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO contract_items
                (contract_id, item_kind, item_id, quantity, unit_cost, hours)
             VALUES ($1, $2, $3, COALESCE($4, 1), COALESCE($5, 0), $6)
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ContractItem>(&query)
            .bind(contract_id)
            .bind(&input.item_kind)
            .bind(input.item_id)
            .bind(input.quantity)
            .bind(input.unit_cost)
            .bind(input.hours)
            .fetch_one(pool)
            .await
    }

    /// List a contract's line items in insertion order.
    pub async fn list_items(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<ContractItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM contract_items WHERE contract_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ContractItem>(&query)
            .bind(contract_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a line item. Returns `true` if a row was removed.
    pub async fn delete_item(
        pool: &PgPool,
        contract_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM contract_items WHERE id = $1 AND contract_id = $2")
                .bind(item_id)
                .bind(contract_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count line items across all contracts that reference the given
    /// resource / provider / personnel record. Used to block deletions.
    pub async fn count_item_references(
        pool: &PgPool,
        item_kind: &str,
        item_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM contract_items WHERE item_kind = $1 AND item_id = $2",
        )
        .bind(item_kind)
        .bind(item_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }
}
