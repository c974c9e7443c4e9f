//! Request boundary for the employee records service.
//!
//! Maps route-level calls onto `ems_core` use-cases and turns domain errors
//! into status-coded `ApiError` envelopes.

pub mod api;
pub mod error;

pub use api::{ApiResponse, ApiResult, EmployeeApi, EmployeeFilter, EMPLOYEES_PATH};
pub use error::ApiError;
