//! Status-coded error envelope returned by the boundary.

use crate::api::EMPLOYEES_PATH;
use ems_core::EmployeeServiceError;
use log::error;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const EMPLOYEE_ROUTE: &str = "/api/v1/employees/{email}";

/// Error body returned for every failed boundary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    /// Route the failing call was made against.
    pub path: String,
    pub status_code: u16,
    /// Unix epoch milliseconds.
    pub time_stamp: i64,
}

impl ApiError {
    pub fn new(message: impl Into<String>, path: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            status_code,
            time_stamp: now_epoch_ms(),
        }
    }

    /// Builds a 500 without leaking storage details to the caller.
    pub fn internal(path: impl Into<String>, cause: &dyn Error) -> Self {
        let path = path.into();
        error!("{}", internal_error_event(&path, cause));
        Self::new(INTERNAL_ERROR_MESSAGE, path, STATUS_INTERNAL_ERROR)
    }

    /// Maps a domain error to its status code.
    ///
    /// - `DuplicateEmail`, `Validation` -> 400
    /// - `EmployeeNotFound` -> 404
    /// - `Repo` -> 500, message redacted
    pub fn from_service_error(err: &EmployeeServiceError, path: impl Into<String>) -> Self {
        match err {
            EmployeeServiceError::DuplicateEmail(_) | EmployeeServiceError::Validation(_) => {
                Self::new(err.to_string(), path, STATUS_BAD_REQUEST)
            }
            EmployeeServiceError::EmployeeNotFound(_) => {
                Self::new(err.to_string(), path, STATUS_NOT_FOUND)
            }
            EmployeeServiceError::Repo(_) => Self::internal(path, err),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status_code, self.path, self.message)
    }
}

impl Error for ApiError {}

/// Log line for a 500. Carries the route template, never the concrete path.
fn internal_error_event(path: &str, cause: &dyn Error) -> String {
    format!(
        "event=api_error module=api status={STATUS_INTERNAL_ERROR} route={} error={cause}",
        route_template(path)
    )
}

fn route_template(path: &str) -> &'static str {
    match path.strip_prefix(EMPLOYEES_PATH) {
        Some("") => EMPLOYEES_PATH,
        Some(rest) if rest.starts_with('/') => EMPLOYEE_ROUTE,
        _ => "unknown",
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
