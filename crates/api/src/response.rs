//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`
//! to get compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope: `{ "data": [...], "pagination": {...} }`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl<T: Serialize> PageResponse<T> {
    pub fn new(data: Vec<T>, params: &hytte_core::pagination::PageParams, total: i64) -> Self {
        let has_more = params.has_more(data.len(), total);
        Self {
            data,
            pagination: Pagination {
                page: params.page(),
                limit: params.limit(),
                total,
                has_more,
            },
        }
    }
}
