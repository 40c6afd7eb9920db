//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use truenavi_lib::Error as LibError;

/// Problem type URI for node identifiers that do not exist.
pub const PROBLEM_UNKNOWN_NODE: &str = "/problems/unknown-node";

/// Problem type URI for edge identifiers that do not exist.
pub const PROBLEM_UNKNOWN_EDGE: &str = "/problems/unknown-edge";

/// Problem type URI for routes that cannot be found.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for edges that reference missing nodes.
pub const PROBLEM_REFERENTIAL_INTEGRITY: &str = "/problems/referential-integrity";

/// Problem type URI for writes that violate a uniqueness rule.
pub const PROBLEM_CONFLICT: &str = "/problems/conflict";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all service endpoints.
///
/// # Example
///
/// ```
/// use truenavi_service_shared::{ProblemDetails, PROBLEM_UNKNOWN_NODE};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_UNKNOWN_NODE,
///     "Unknown Node",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Node '0192f1c4' not found")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn unknown_node(id: &str, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND)
            .with_detail(format!("Node '{}' not found", id))
            .with_request_id(request_id)
    }

    pub fn unknown_edge(id: &str, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNKNOWN_EDGE, "Unknown Edge", StatusCode::NOT_FOUND)
            .with_detail(format!("Edge '{}' not found", id))
            .with_request_id(request_id)
    }

    /// Create a 400 problem for an edge whose endpoint does not exist.
    pub fn referential_integrity(node: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_REFERENTIAL_INTEGRITY,
            "Referenced Node Missing",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(format!("Edge references node '{}' which does not exist", node))
        .with_request_id(request_id)
    }

    /// Create a 409 Conflict problem.
    pub fn conflict(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_CONFLICT, "Conflict", StatusCode::CONFLICT)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for unreachable routes.
    pub fn route_not_found(reason: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(reason)
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
/// Store failures are logged here and reported without their internals.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::ReferentialIntegrity { node } => {
            ProblemDetails::referential_integrity(node, request_id)
        }
        LibError::Validation { message } => ProblemDetails::bad_request(message.clone(), request_id),
        LibError::DuplicateEdge { .. } | LibError::DuplicateNodeName { .. } => {
            ProblemDetails::conflict(error.to_string(), request_id)
        }
        LibError::NodeNotFound { id } => ProblemDetails::unknown_node(id, request_id),
        LibError::EdgeNotFound { id } => ProblemDetails::unknown_edge(id, request_id),
        LibError::DataSource(_) | LibError::Serialization(_) | LibError::Io(_) => {
            tracing::error!(request_id, error = %error, "store operation failed");
            ProblemDetails::internal_error("The navigation store is unavailable", request_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_new() {
        let problem = ProblemDetails::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND);
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_NODE);
        assert_eq!(problem.title, "Unknown Node");
        assert_eq!(problem.status, 404);
    }

    #[test]
    fn test_problem_details_bad_request() {
        let problem = ProblemDetails::bad_request("Invalid JSON", "req-123");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.instance.as_deref(), Some("req-123"));
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem = ProblemDetails::bad_request("Test error", "req-test");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-request\""));
        assert!(json.contains("\"title\":\"Invalid Request\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"detail\":\"Test error\""));
        assert!(json.contains("\"instance\":\"req-test\""));
    }

    #[test]
    fn test_problem_response_uses_problem_content_type() {
        let response = ProblemDetails::conflict("taken", "req-1").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    #[test]
    fn test_from_lib_error_status_classes() {
        let cases = [
            (
                LibError::ReferentialIntegrity {
                    node: "n1".to_string(),
                },
                400,
                PROBLEM_REFERENTIAL_INTEGRITY,
            ),
            (LibError::validation("bad latitude"), 400, PROBLEM_INVALID_REQUEST),
            (
                LibError::DuplicateEdge {
                    start: "a".to_string(),
                    end: "b".to_string(),
                },
                409,
                PROBLEM_CONFLICT,
            ),
            (
                LibError::NodeNotFound {
                    id: "n1".to_string(),
                },
                404,
                PROBLEM_UNKNOWN_NODE,
            ),
            (
                LibError::EdgeNotFound {
                    id: "e1".to_string(),
                },
                404,
                PROBLEM_UNKNOWN_EDGE,
            ),
            (
                LibError::from(rusqlite::Error::InvalidQuery),
                500,
                PROBLEM_INTERNAL_ERROR,
            ),
        ];

        for (error, status, type_uri) in cases {
            let problem = from_lib_error(&error, "req-lib");
            assert_eq!(problem.status, status, "{error}");
            assert_eq!(problem.type_uri, type_uri, "{error}");
        }
    }

    #[test]
    fn test_from_lib_error_hides_store_details() {
        let problem = from_lib_error(&LibError::from(rusqlite::Error::InvalidQuery), "req");
        assert!(!problem.detail.unwrap().contains("Query"));
    }
}
