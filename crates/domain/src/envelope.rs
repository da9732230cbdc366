//! Uniform API response envelope.
//!
//! Every endpoint wraps its payload the same way: `{success, message, data}`
//! for single objects, with pagination fields added for lists. Error bodies
//! use `{success: false, error, message}` and are built by the API crate's
//! error type.

use serde::Serialize;
use shared::pagination::PageMeta;

/// Success envelope for a single payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Success envelope for a paginated list payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            success: true,
            count: meta.count,
            total: meta.total,
            page: meta.page,
            total_pages: meta.total_pages,
            data,
        }
    }
}
