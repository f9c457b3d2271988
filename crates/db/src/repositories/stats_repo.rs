//! Aggregation queries backing the overview endpoint.

use sqlx::{FromRow, PgPool};

/// One `status -> count` bucket.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Provides read-only aggregation queries.
pub struct StatsRepo;

impl StatsRepo {
    /// Events grouped by status.
    pub async fn events_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM events GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Contracts grouped by status.
    pub async fn contracts_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM contracts GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Reports grouped by status.
    pub async fn reports_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM reports GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Sum of budgets across active contracts.
    pub async fn active_contract_budget(pool: &PgPool) -> Result<f64, sqlx::Error> {
        let total: (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(budget), 0)::float8 FROM contracts WHERE status = 'activo'",
        )
        .fetch_one(pool)
        .await?;
        Ok(total.0)
    }

    /// Total row counts for the headline tiles.
    pub async fn entity_counts(pool: &PgPool) -> Result<EntityCounts, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM events),
                    (SELECT COUNT(*) FROM contracts),
                    (SELECT COUNT(*) FROM resources),
                    (SELECT COUNT(*) FROM providers),
                    (SELECT COUNT(*) FROM personnel)",
        )
        .fetch_one(pool)
        .await?;
        Ok(EntityCounts {
            events: row.0,
            contracts: row.1,
            resources: row.2,
            providers: row.3,
            personnel: row.4,
        })
    }
}

/// Headline totals returned by [`StatsRepo::entity_counts`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct EntityCounts {
    pub events: i64,
    pub contracts: i64,
    pub resources: i64,
    pub providers: i64,
    pub personnel: i64,
}
