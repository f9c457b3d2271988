//! Shared response envelope types for API handlers.
//!
//! Every endpoint wraps its payload in the `{"success": true, ...}`
//! envelope; list endpoints additionally carry pagination totals. Use these
//! types instead of ad-hoc `serde_json::json!` so serialization stays
//! consistent across handlers.

use serde::Serialize;

use logievents_core::pagination::page_count;

/// Standard `{"success": true, "data": T}` response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T) -> Self {
        Envelope {
            success: true,
            data,
        }
    }
}

/// Envelope for paginated collections:
/// `{"success": true, "data": [...], "total": n, "page": p, "pages": k}`.
#[derive(Debug, Serialize)]
pub struct PagedEnvelope<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T: Serialize> PagedEnvelope<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        PagedEnvelope {
            success: true,
            data,
            total,
            page,
            pages: page_count(total, limit),
        }
    }
}

/// Envelope for endpoints that only report an outcome message.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl MessageEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        MessageEnvelope {
            success: true,
            message: message.into(),
        }
    }
}
