//! Repository for the `events` table.

use sqlx::PgPool;

use logievents_core::pagination::{clamp_limit, clamp_page, offset};
use logievents_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::repositories::DeleteOutcome;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, location, starts_at, ends_at, status, \
    event_type_id, contract_id, responsable_id, created_by, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    ///
    /// `responsable_id` must already be resolved (callers default it to the
    /// creating user); status starts at the table default `planeacion`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        responsable_id: DbId,
        created_by: DbId,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (name, description, location, starts_at, ends_at,
                 event_type_id, contract_id, responsable_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.event_type_id)
            .bind(input.contract_id)
            .bind(responsable_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an event with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List events newest-first with optional status / type / ownership
    /// filters, returning the matching rows and the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Event>, i64), sqlx::Error> {
        let page = clamp_page(page);
        let limit = clamp_limit(limit);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.event_type_id.is_some() {
            conditions.push(format!("event_type_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.responsable_id.is_some() {
            conditions.push(format!("responsable_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM events {where_clause}
             ORDER BY starts_at DESC
             LIMIT ${p1} OFFSET ${p2}",
            p1 = param_idx,
            p2 = param_idx + 1
        );
        let mut rows = sqlx::query_as::<_, Event>(&query);
        if let Some(status) = &filter.status {
            rows = rows.bind(status);
        }
        if let Some(type_id) = filter.event_type_id {
            rows = rows.bind(type_id);
        }
        if let Some(owner) = filter.responsable_id {
            rows = rows.bind(owner);
        }
        let rows = rows.bind(limit).bind(offset(page, limit)).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM events {where_clause}");
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(status) = &filter.status {
            count = count.bind(status);
        }
        if let Some(type_id) = filter.event_type_id {
            count = count.bind(type_id);
        }
        if let Some(owner) = filter.responsable_id {
            count = count.bind(owner);
        }
        let total = count.fetch_one(pool).await?;

        Ok((rows, total.0))
    }

    /// Update an event. Only non-`None` fields in `input` are applied;
    /// status is never touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                event_type_id = COALESCE($7, event_type_id),
                contract_id = COALESCE($8, contract_id),
                responsable_id = COALESCE($9, responsable_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.event_type_id)
            .bind(input.contract_id)
            .bind(input.responsable_id)
            .fetch_optional(pool)
            .await
    }

    /// Set an event's status. Transition legality is checked by the caller.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("UPDATE events SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event unless reports still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let refs: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports WHERE event_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        if refs.0 > 0 {
            return Ok(DeleteOutcome::Blocked(refs.0));
        }

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
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
