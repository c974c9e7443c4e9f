//! Employee use-case service.
//!
//! # Responsibility
//! - Provide create/list/search/update/delete entry points for callers.
//! - Translate storage outcomes into a closed set of domain errors.
//! - Project stored employees into `EmployeeResponse`.
//!
//! # Invariants
//! - Create never produces a second row for an existing email.
//! - Update, partial update and delete require an existing row and fail with
//!   `EmployeeNotFound(email)` otherwise.
//! - Full update keeps the path email as identity; the body email is ignored.
//! - Partial update never changes email.

use crate::model::employee::{
    Employee, EmployeePatch, EmployeeRequest, EmployeeResponse, EmployeeValidationError,
};
use crate::repo::employee_repo::{EmployeeRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Domain error returned by every employee use-case.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// Create targeted an email that is already taken.
    DuplicateEmail(String),
    /// No employee is stored under the searched email.
    EmployeeNotFound(String),
    /// Request payload failed field validation.
    Validation(EmployeeValidationError),
    /// Storage or connectivity failure, passed through unchanged.
    Repo(RepoError),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => {
                write!(f, "Employee already exists with email: {email}")
            }
            Self::EmployeeNotFound(email) => write!(f, "Employee not found with email: {email}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ConstraintViolation { email } => Self::DuplicateEmail(email),
            other => Self::Repo(other),
        }
    }
}

impl From<EmployeeValidationError> for EmployeeServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, EmployeeServiceError>;

/// Employee service facade over a storage gateway.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one employee.
    ///
    /// # Contract
    /// - Fails with `DuplicateEmail` when the email is already stored, both on
    ///   the pre-check and when a concurrent insert wins the race.
    pub fn create(&self, request: &EmployeeRequest) -> ServiceResult<EmployeeResponse> {
        request.validate()?;

        if self.repo.find_by_email(&request.email)?.is_some() {
            warn!("event=employee_create module=service status=rejected reason=duplicate_email");
            return Err(EmployeeServiceError::DuplicateEmail(request.email.clone()));
        }

        let created = self.repo.insert(&request.to_new_employee()).map_err(|err| {
            let err = EmployeeServiceError::from(err);
            if matches!(err, EmployeeServiceError::DuplicateEmail(_)) {
                warn!("event=employee_create module=service status=rejected reason=constraint_violation");
            }
            err
        })?;

        info!(
            "event=employee_create module=service status=ok id={}",
            created.id
        );
        Ok(created.into())
    }

    /// Lists all employees in store order.
    pub fn list(&self) -> ServiceResult<Vec<EmployeeResponse>> {
        project_all(self.repo.find_all()?)
    }

    /// Case-insensitive exact match on first name.
    pub fn find_by_first_name(&self, first_name: &str) -> ServiceResult<Vec<EmployeeResponse>> {
        project_all(self.repo.find_by_first_name(first_name)?)
    }

    /// Case-insensitive exact match on last name.
    pub fn find_by_last_name(&self, last_name: &str) -> ServiceResult<Vec<EmployeeResponse>> {
        project_all(self.repo.find_by_last_name(last_name)?)
    }

    /// Case-insensitive exact match on department code.
    pub fn find_by_department_code(
        &self,
        department_code: &str,
    ) -> ServiceResult<Vec<EmployeeResponse>> {
        project_all(self.repo.find_by_department_code(department_code)?)
    }

    /// Exact-match lookup; `None` when absent.
    pub fn find_by_email(&self, email: &str) -> ServiceResult<Option<EmployeeResponse>> {
        Ok(self.repo.find_by_email(email)?.map(EmployeeResponse::from))
    }

    /// Replaces all fields of the employee stored under `email`.
    ///
    /// `request.email` is not used for identity: the stored email is reset to
    /// the `email` argument.
    pub fn update_employee(
        &self,
        email: &str,
        request: &EmployeeRequest,
    ) -> ServiceResult<EmployeeResponse> {
        request.validate()?;

        let mut employee = self.require_by_email(email)?;
        employee.first_name.clone_from(&request.first_name);
        employee.last_name.clone_from(&request.last_name);
        employee.department_code.clone_from(&request.department_code);
        employee.email = email.to_string();

        let saved = self.repo.save(&employee)?;
        info!(
            "event=employee_update module=service status=ok mode=full id={}",
            saved.id
        );
        Ok(saved.into())
    }

    /// Overwrites only the fields present in `patch`.
    pub fn update_employee_partially(
        &self,
        email: &str,
        patch: &EmployeePatch,
    ) -> ServiceResult<EmployeeResponse> {
        let mut employee = self.require_by_email(email)?;
        patch.apply_to(&mut employee);

        let saved = self.repo.save(&employee)?;
        info!(
            "event=employee_update module=service status=ok mode=partial id={} empty_patch={}",
            saved.id,
            patch.is_empty()
        );
        Ok(saved.into())
    }

    /// Physically removes the employee stored under `email`.
    pub fn delete_employee(&self, email: &str) -> ServiceResult<()> {
        let employee = self.require_by_email(email)?;
        let removed = self.repo.delete_by_email(email)?;
        info!(
            "event=employee_delete module=service status=ok id={} removed={removed}",
            employee.id
        );
        Ok(())
    }

    fn require_by_email(&self, email: &str) -> ServiceResult<Employee> {
        self.repo.find_by_email(email)?.ok_or_else(|| {
            warn!("event=employee_lookup module=service status=not_found");
            EmployeeServiceError::EmployeeNotFound(email.to_string())
        })
    }
}

fn project_all(employees: Vec<Employee>) -> ServiceResult<Vec<EmployeeResponse>> {
    Ok(employees.into_iter().map(EmployeeResponse::from).collect())
}
