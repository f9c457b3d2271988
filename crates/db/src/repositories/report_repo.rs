//! Repository for the `reports` table.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::report::{CreateReport, Report, ReportFilter, UpdateReport};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, body, status, event_id, contract_id, created_by, created_at, updated_at";

/// Provides CRUD operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new report, returning the created row. Status starts at the
    /// table default `pendiente`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReport,
        created_by: DbId,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (title, body, event_id, contract_id, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.event_id)
            .bind(input.contract_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a report by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reports newest-first with optional filters, returning the
    /// matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &ReportFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Report>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.event_id.is_some() {
            conditions.push(format!("event_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.contract_id.is_some() {
            conditions.push(format!("contract_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM reports {where_clause}
             ORDER BY created_at DESC
             LIMIT ${p1} OFFSET ${p2}",
            p1 = param_idx,
            p2 = param_idx + 1
        );
        let mut rows = sqlx::query_as::<_, Report>(&query);
        if let Some(status) = &filter.status {
            rows = rows.bind(status);
        }
        if let Some(event_id) = filter.event_id {
            rows = rows.bind(event_id);
        }
        if let Some(contract_id) = filter.contract_id {
            rows = rows.bind(contract_id);
        }
        let rows = rows.bind(limit).bind(offset(page, limit)).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM reports {where_clause}");
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(status) = &filter.status {
            count = count.bind(status);
        }
        if let Some(event_id) = filter.event_id {
            count = count.bind(event_id);
        }
        if let Some(contract_id) = filter.contract_id {
            count = count.bind(contract_id);
        }
        let total = count.fetch_one(pool).await?;

        Ok((rows, total.0))
    }

    /// Update a report's text. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReport,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports SET
                title = COALESCE($2, title),
                body = COALESCE($3, body)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .fetch_optional(pool)
            .await
    }

    /// Set a report's status. Transition legality is checked by the caller.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("UPDATE reports SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a report. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
