//! Success response envelope shared by both services.
//!
//! Error responses are built by `Error::into_response`; this module covers
//! the `{ "success": true, ... }` half of the contract.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Raw `page`/`limit` query parameters accepted by every list endpoint.
/// `limit` beyond 100 is rejected by the caller with `VALIDATION_ERROR`
/// rather than silently clamped, per the pagination contract.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Resolves `page`/`limit` against `default_limit`, returning
    /// `(page, limit, offset)`. Errors with `Error::Validation` if an
    /// explicit `limit` is outside `[1, 100]` or `page` is `0`.
    pub fn resolve(self, default_limit: u32) -> crate::Result<(u32, u32, i64)> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(crate::Error::Validation("page must be >= 1".to_string()));
        }
        let limit = self.limit.unwrap_or(default_limit);
        if !(1..=100).contains(&limit) {
            return Err(crate::Error::Validation(
                "limit must be between 1 and 100".to_string(),
            ));
        }
        let offset = (page as i64 - 1) * limit as i64;
        Ok((page, limit, offset))
    }
}

/// Pagination metadata attached to list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: i64,
    pub limit: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let pages = if total <= 0 {
            1
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            page,
            pages: pages.max(1),
            total,
            limit,
            has_next: (page as i64) < pages as i64,
            has_prev: page > 1,
        }
    }
}

/// A successful API response, optionally carrying data and pagination.
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: Option<String>,
    data: Option<T>,
    pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// A success response with only a message, no data payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut body = json!({ "success": true });
        if let Some(message) = self.message {
            body["message"] = json!(message);
        }
        if let Some(data) = self.data {
            body["data"] = serde_json::to_value(data).unwrap_or(serde_json::Value::Null);
        }
        if let Some(pagination) = self.pagination {
            body["pagination"] = serde_json::to_value(pagination).unwrap_or(serde_json::Value::Null);
        }
        (self.status, Json(body)).into_response()
    }
}
