//! Route-level use-case API over the employee service.
//!
//! # Responsibility
//! - Expose one function per route of `/api/v1/employees`.
//! - Open a migrated connection per call and run exactly one use-case on it.
//! - Attach success status codes and map failures to `ApiError`.
//!
//! # Invariants
//! - Calls never panic; every failure becomes an `ApiError`.
//! - Storage failures surface as redacted 500s.

use crate::error::ApiError;
use ems_core::db::open_db;
use ems_core::{
    EmployeePatch, EmployeeRequest, EmployeeResponse, EmployeeService, EmployeeServiceError,
    ServiceResult, SqliteEmployeeRepository,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base route for employee resources.
pub const EMPLOYEES_PATH: &str = "/api/v1/employees";

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Successful boundary outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub body: T,
}

/// Optional search filter for the collection route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmployeeFilter {
    #[default]
    All,
    FirstName(String),
    LastName(String),
    DepartmentCode(String),
}

/// Employee routes bound to one database file.
#[derive(Debug, Clone)]
pub struct EmployeeApi {
    db_path: PathBuf,
}

impl EmployeeApi {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// `POST /api/v1/employees` -> 201.
    pub fn create(&self, request: &EmployeeRequest) -> ApiResult<EmployeeResponse> {
        self.call("POST", EMPLOYEES_PATH.to_string(), STATUS_CREATED, |service| {
            service.create(request)
        })
    }

    /// `GET /api/v1/employees[?field=value]` -> 200.
    pub fn list(&self, filter: &EmployeeFilter) -> ApiResult<Vec<EmployeeResponse>> {
        self.call("GET", EMPLOYEES_PATH.to_string(), STATUS_OK, |service| {
            match filter {
                EmployeeFilter::All => service.list(),
                EmployeeFilter::FirstName(value) => service.find_by_first_name(value),
                EmployeeFilter::LastName(value) => service.find_by_last_name(value),
                EmployeeFilter::DepartmentCode(value) => service.find_by_department_code(value),
            }
        })
    }

    /// `GET /api/v1/employees/{email}` -> 200, or 404 when absent.
    pub fn get(&self, email: &str) -> ApiResult<EmployeeResponse> {
        let path = employee_path(email);
        let found = self.call("GET", path.clone(), STATUS_OK, |service| {
            service.find_by_email(email)
        })?;
        match found.body {
            Some(body) => Ok(ApiResponse {
                status_code: found.status_code,
                body,
            }),
            None => Err(ApiError::from_service_error(
                &EmployeeServiceError::EmployeeNotFound(email.to_string()),
                path,
            )),
        }
    }

    /// `PUT /api/v1/employees/{email}` -> 200. The path email wins over the body.
    pub fn update(&self, email: &str, request: &EmployeeRequest) -> ApiResult<EmployeeResponse> {
        self.call("PUT", employee_path(email), STATUS_OK, |service| {
            service.update_employee(email, request)
        })
    }

    /// `PATCH /api/v1/employees/{email}` -> 200.
    pub fn patch(&self, email: &str, patch: &EmployeePatch) -> ApiResult<EmployeeResponse> {
        self.call("PATCH", employee_path(email), STATUS_OK, |service| {
            service.update_employee_partially(email, patch)
        })
    }

    /// `DELETE /api/v1/employees/{email}` -> 204.
    pub fn delete(&self, email: &str) -> ApiResult<()> {
        self.call("DELETE", employee_path(email), STATUS_NO_CONTENT, |service| {
            service.delete_employee(email)
        })
    }

    fn call<T>(
        &self,
        method: &'static str,
        path: String,
        success_status: u16,
        f: impl FnOnce(&EmployeeService<SqliteEmployeeRepository<'_>>) -> ServiceResult<T>,
    ) -> ApiResult<T> {
        let conn = open_db(&self.db_path).map_err(|err| ApiError::internal(path.as_str(), &err))?;
        let repo = SqliteEmployeeRepository::try_new(&conn)
            .map_err(|err| ApiError::internal(path.as_str(), &err))?;
        let service = EmployeeService::new(repo);

        match f(&service) {
            Ok(body) => {
                info!("event=api_call module=api method={method} status={success_status}");
                Ok(ApiResponse {
                    status_code: success_status,
                    body,
                })
            }
            Err(err) => {
                let api_error = ApiError::from_service_error(&err, path);
                info!(
                    "event=api_call module=api method={method} status={}",
                    api_error.status_code
                );
                Err(api_error)
            }
        }
    }
}

fn employee_path(email: &str) -> String {
    format!("{EMPLOYEES_PATH}/{email}")
}

#[cfg(test)]
mod tests {
    use super::{EmployeeApi, EmployeeFilter, STATUS_CREATED, STATUS_NO_CONTENT, STATUS_OK};
    use ems_core::{EmployeePatch, EmployeeRequest};

    fn api_in(dir: &tempfile::TempDir) -> EmployeeApi {
        EmployeeApi::new(dir.path().join("ems.sqlite3"))
    }

    fn john() -> EmployeeRequest {
        EmployeeRequest::new("John", "Doe", "john@doe.com", "Compro")
    }

    #[test]
    fn create_returns_201_then_duplicate_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);

        let created = api.create(&john()).unwrap();
        assert_eq!(created.status_code, STATUS_CREATED);
        assert_eq!(created.body.last_name, "Doe");

        let duplicate = api.create(&john()).unwrap_err();
        assert_eq!(duplicate.status_code, 400);
        assert_eq!(duplicate.path, "/api/v1/employees");
    }

    #[test]
    fn invalid_request_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);

        let err = api
            .create(&EmployeeRequest::new("John", "Doe", "not-an-email", "Compro"))
            .unwrap_err();
        assert_eq!(err.status_code, 400);
    }

    #[test]
    fn list_supports_field_filters() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);
        api.create(&john()).unwrap();
        api.create(&EmployeeRequest::new("Jane", "Smith", "jane@smith.com", "HR"))
            .unwrap();

        let all = api.list(&EmployeeFilter::All).unwrap();
        assert_eq!(all.status_code, STATUS_OK);
        assert_eq!(all.body.len(), 2);

        let hr = api
            .list(&EmployeeFilter::DepartmentCode("hr".to_string()))
            .unwrap();
        assert_eq!(hr.body.len(), 1);
        assert_eq!(hr.body[0].first_name, "Jane");
    }

    #[test]
    fn patch_put_and_delete_follow_route_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);
        api.create(&john()).unwrap();

        let patch = EmployeePatch {
            last_name: Some("McIntier".to_string()),
            department_code: Some("Medicine".to_string()),
            ..EmployeePatch::default()
        };
        let patched = api.patch("john@doe.com", &patch).unwrap();
        assert_eq!(patched.status_code, STATUS_OK);
        assert_eq!(patched.body.department_code, "Medicine");

        let replaced = api
            .update(
                "john@doe.com",
                &EmployeeRequest::new("Johnny", "Doe", "other@x.com", "Sec"),
            )
            .unwrap();
        assert_eq!(replaced.body.first_name, "Johnny");
        assert_eq!(api.get("john@doe.com").unwrap().body.department_code, "Sec");

        let deleted = api.delete("john@doe.com").unwrap();
        assert_eq!(deleted.status_code, STATUS_NO_CONTENT);

        let missing = api.delete("john@doe.com").unwrap_err();
        assert_eq!(missing.status_code, 404);
        assert_eq!(missing.path, "/api/v1/employees/john@doe.com");
        assert_eq!(missing.message, "Employee not found with email: john@doe.com");
    }

    #[test]
    fn get_missing_email_returns_404() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);

        let err = api.get("ghost@x.com").unwrap_err();
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "Employee not found with email: ghost@x.com");
        assert_eq!(err.path, "/api/v1/employees/ghost@x.com");
    }

    #[test]
    fn corrupted_row_surfaces_as_redacted_500() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_in(&dir);
        api.create(&john()).unwrap();

        let conn = rusqlite::Connection::open(api.db_path()).unwrap();
        conn.execute("UPDATE employees SET id = 'not-a-uuid';", [])
            .unwrap();
        drop(conn);

        let err = api.list(&EmployeeFilter::All).unwrap_err();
        assert_eq!(err.status_code, 500);
        assert_eq!(err.message, "Internal server error");
    }
}
