//! Wire-level API contract shared by the server and Rust clients.
//!
//! The record and create-input shapes live in [`crate::proposal`]; this
//! module carries the remaining response bodies and the route paths so
//! server and client cannot drift.

use serde::{Deserialize, Serialize};

use crate::proposal::ValidationError;

/// `POST /api/proposals`
pub const CREATE_PATH: &str = "/api/proposals";

/// `GET /api/proposals/{id}` (axum route syntax).
pub const GET_ROUTE: &str = "/api/proposals/{id}";

/// `POST /api/proposals/{id}/accept` (axum route syntax).
pub const ACCEPT_ROUTE: &str = "/api/proposals/{id}/accept";

/// Concrete URL path for fetching one proposal.
pub fn get_path(id: &str) -> String {
    format!("/api/proposals/{id}")
}

/// Concrete URL path for accepting one proposal.
pub fn accept_path(id: &str) -> String {
    format!("/api/proposals/{id}/accept")
}

/// Body of the 404 responses.
pub const NOT_FOUND_MESSAGE: &str = "Proposal not found";

/// Body of the 500 response. Internal detail never reaches clients.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Successful accept: the minimum a downstream notifier needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    pub success: bool,
    pub phone_number: String,
    pub partner_name: String,
}

/// Error body for 400/404/500. `field` is present only for validation
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            message: message.into(),
            field: None,
        }
    }
}

impl From<ValidationError> for ErrorBody {
    fn from(err: ValidationError) -> Self {
        ErrorBody {
            message: err.message.to_string(),
            field: Some(err.field.to_string()),
        }
    }
}
