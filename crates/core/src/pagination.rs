//! Pagination constants and clamp helpers.
//!
//! Lives in `core` (zero internal deps) so both the repository layer and the
//! API handlers agree on page arithmetic.

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of records per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to at least 1. Pages are 1-based.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Row offset for a 1-based page.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// Total page count for `total` rows at `limit` per page.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(3, 20), 40);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
    }
}
