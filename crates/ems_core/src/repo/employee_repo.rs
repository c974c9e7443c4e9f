//! Employee storage gateway and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/find/save/delete primitives over the `employees` table.
//! - Translate unique-index violations on `email` into a typed error.
//!
//! # Invariants
//! - `insert` assigns a fresh `EmployeeId`; callers never supply one.
//! - Name and department lookups are case-insensitive exact matches.
//! - `email` lookups and uniqueness are exact (case-sensitive).
//! - Multi-row reads are ordered by insertion (`created_at`, then `rowid`).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, NewEmployee};
use rusqlite::ffi;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    department_code
FROM employees";

const EMPLOYEE_ORDER_SQL: &str = "ORDER BY created_at ASC, rowid ASC";

const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "department_code",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage gateway error for employee persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// A write collided with the unique index on `email`.
    ConstraintViolation { email: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation { email } => {
                write!(f, "unique constraint violated for email `{email}`")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence primitives over employee records.
pub trait EmployeeRepository {
    /// Stores a new employee and returns it with its assigned id.
    fn insert(&self, employee: &NewEmployee) -> RepoResult<Employee>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Vec<Employee>>;
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Employee>>;
    fn find_by_department_code(&self, department_code: &str) -> RepoResult<Vec<Employee>>;
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    /// Returns the number of rows removed (0 or 1). Absence is not an error.
    fn delete_by_email(&self, email: &str) -> RepoResult<usize>;
    /// Upserts by id.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    fn count_by_email(&self, email: &str) -> RepoResult<usize>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `employees`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_list(&self, filter_column: Option<&str>, value: &str) -> RepoResult<Vec<Employee>> {
        let sql = match filter_column {
            Some(column) => format!(
                "{EMPLOYEE_SELECT_SQL} WHERE {column} = ?1 COLLATE NOCASE {EMPLOYEE_ORDER_SQL};"
            ),
            None => format!("{EMPLOYEE_SELECT_SQL} {EMPLOYEE_ORDER_SQL};"),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match filter_column {
            Some(_) => stmt.query([value])?,
            None => stmt.query([])?,
        };

        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert(&self, employee: &NewEmployee) -> RepoResult<Employee> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO employees (
                    id,
                    first_name,
                    last_name,
                    email,
                    department_code
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    id.to_string(),
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.email.as_str(),
                    employee.department_code.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, &employee.email))?;

        Ok(employee.clone().into_employee(id))
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_employee_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        self.conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1;"),
                [email],
                |row| Ok(parse_employee_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Vec<Employee>> {
        self.query_list(Some("first_name"), first_name)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Employee>> {
        self.query_list(Some("last_name"), last_name)
    }

    fn find_by_department_code(&self, department_code: &str) -> RepoResult<Vec<Employee>> {
        self.query_list(Some("department_code"), department_code)
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        self.query_list(None, "")
    }

    fn delete_by_email(&self, email: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM employees WHERE email = ?1;", [email])?;
        Ok(removed)
    }

    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        self.conn
            .execute(
                "INSERT INTO employees (
                    id,
                    first_name,
                    last_name,
                    email,
                    department_code
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    email = excluded.email,
                    department_code = excluded.department_code,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![
                    employee.id.to_string(),
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.email.as_str(),
                    employee.department_code.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, &employee.email))?;

        Ok(employee.clone())
    }

    fn count_by_email(&self, email: &str) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE email = ?1;",
            [email],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

/// Maps a failed write to `ConstraintViolation` when the unique index on
/// `email` rejected it.
fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    if is_email_unique_violation(&err) {
        return RepoError::ConstraintViolation {
            email: email.to_string(),
        };
    }
    err.into()
}

fn is_email_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                && message
                    .as_deref()
                    .map_or(true, |text| text.contains("employees.email"))
        }
        _ => false,
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in employees.id"))
    })?;

    Ok(Employee {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        department_code: row.get("department_code")?,
    })
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "employees", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
