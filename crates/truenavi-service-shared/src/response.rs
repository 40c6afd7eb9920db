//! Response envelope for successful HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Envelope for successful responses: `{"success": true, "count": n, "data": ...}`.
///
/// `count` is only present for collection responses.
///
/// # Example
///
/// ```
/// use truenavi_service_shared::ServiceResponse;
///
/// let response = ServiceResponse::list(vec!["a", "b"]);
/// assert_eq!(response.count, Some(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// The actual response payload.
    pub data: T,

    /// Status code used when converting into an HTTP response.
    #[serde(skip, default = "default_status")]
    status: StatusCode,
}

fn default_status() -> StatusCode {
    StatusCode::OK
}

impl<T> ServiceResponse<T> {
    /// Create a new 200 OK response for a single item.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
            status: StatusCode::OK,
        }
    }

    /// Create a 201 Created response.
    pub fn created(data: T) -> Self {
        Self::new(data).with_status(StatusCode::CREATED)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> ServiceResponse<Vec<T>> {
    /// Create a 200 OK response for a collection, filling in `count`.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::new(items)
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
