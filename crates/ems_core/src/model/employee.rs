//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted `Employee` record and its insert shape.
//! - Define request, patch and response payloads used by the service layer.
//!
//! # Invariants
//! - `id` is assigned once by the storage gateway and never changes.
//! - `email` is unique across all stored employees.
//! - Responses never expose `id` or `email`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Stable surrogate identifier for a stored employee.
pub type EmployeeId = Uuid;

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Assigned by the storage gateway on insert.
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Natural key used by every lookup/update/delete path.
    pub email: String,
    pub department_code: String,
}

/// Employee fields before the storage gateway assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_code: String,
}

impl NewEmployee {
    /// Attaches a stored identity to these fields.
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department_code: self.department_code,
        }
    }
}

/// Create and full-update payload. All four fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    /// On full update this value is ignored; the path email stays authoritative.
    pub email: String,
    pub department_code: String,
}

impl EmployeeRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        department_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            department_code: department_code.into(),
        }
    }

    /// Checks required-field rules for create and full update.
    ///
    /// # Errors
    /// - `BlankField` when a name or department code is empty after trim.
    /// - `InvalidEmail` when `email` is not shaped `local@domain`.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("departmentCode", &self.department_code),
        ] {
            if value.trim().is_empty() {
                return Err(EmployeeValidationError::BlankField(field));
            }
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(EmployeeValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Builds the insert shape for a new employee.
    pub fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            department_code: self.department_code.clone(),
        }
    }
}

/// Partial-update payload.
///
/// `None` means the field was omitted and must stay untouched. `Some("")` is a
/// real value and overwrites the stored field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_code: Option<String>,
}

impl EmployeePatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.department_code.is_none()
    }

    /// Overwrites the present fields on `employee`. Email is never touched.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(first_name) = &self.first_name {
            employee.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            employee.last_name.clone_from(last_name);
        }
        if let Some(department_code) = &self.department_code {
            employee.department_code.clone_from(department_code);
        }
    }
}

/// External projection of an employee: names and department only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub first_name: String,
    pub last_name: String,
    pub department_code: String,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            department_code: employee.department_code.clone(),
        }
    }
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            first_name: employee.first_name,
            last_name: employee.last_name,
            department_code: employee.department_code,
        }
    }
}

/// Field-level rejection of a create or full-update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// Named field is empty or whitespace only.
    BlankField(&'static str),
    /// Email does not look like `local@domain`.
    InvalidEmail(String),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
        }
    }
}

impl Error for EmployeeValidationError {}
