//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?page=&limit=`). Pages are 1-based.
///
/// Values are clamped by the `clamp_page` / `clamp_limit` helpers before
/// they reach a query.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
