use ems_core::db::migrations::latest_version;
use ems_core::db::open_db_in_memory;
use ems_core::{EmployeeRepository, NewEmployee, RepoError, SqliteEmployeeRepository};
use rusqlite::Connection;
use std::collections::HashSet;

fn new_employee(first: &str, last: &str, email: &str, department: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        department_code: department.to_string(),
    }
}

#[test]
fn insert_assigns_id_and_find_by_email_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let saved = repo
        .insert(&new_employee("John", "Smith", "john.smith@gmail.com", "Compro"))
        .unwrap();
    assert!(!saved.id.is_nil());

    let loaded = repo.find_by_email("john.smith@gmail.com").unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(repo.find_by_id(saved.id).unwrap(), Some(saved));
}

#[test]
fn insert_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let first = repo
        .insert(&new_employee("John", "Smith", "john@x.com", "Compro"))
        .unwrap();
    let second = repo
        .insert(&new_employee("Jane", "Smith", "jane@x.com", "Compro"))
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn duplicate_email_insert_fails_with_constraint_violation_and_keeps_prior_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let original = repo
        .insert(&new_employee("John", "Smith", "john.smith@gmail.com", "Compro"))
        .unwrap();
    let err = repo
        .insert(&new_employee("Johnny", "S", "john.smith@gmail.com", "Sec"))
        .unwrap_err();

    assert!(
        matches!(err, RepoError::ConstraintViolation { ref email } if email == "john.smith@gmail.com")
    );
    assert_eq!(repo.count_by_email("john.smith@gmail.com").unwrap(), 1);
    assert_eq!(
        repo.find_by_email("john.smith@gmail.com").unwrap(),
        Some(original)
    );
}

#[test]
fn email_lookup_is_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    repo.insert(&new_employee("John", "Smith", "john@x.com", "Compro"))
        .unwrap();

    assert!(repo.find_by_email("JOHN@x.com").unwrap().is_none());
    assert!(repo.find_by_email("john@x.co").unwrap().is_none());
}

#[test]
fn field_searches_are_case_insensitive_exact_matches() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    repo.insert(&new_employee("John", "Smith", "john.smith@gmail.com", "Compro"))
        .unwrap();
    repo.insert(&new_employee("Jane", "Smith", "jane.smith@gmail.com", "Compro"))
        .unwrap();
    repo.insert(&new_employee("Bob", "Smithers", "bob.smith@gmail.com", "Sec"))
        .unwrap();

    let compro: HashSet<_> = repo
        .find_by_department_code("compro")
        .unwrap()
        .into_iter()
        .map(|employee| employee.email)
        .collect();
    assert_eq!(
        compro,
        HashSet::from([
            "john.smith@gmail.com".to_string(),
            "jane.smith@gmail.com".to_string()
        ])
    );

    assert_eq!(repo.find_by_last_name("SMITH").unwrap().len(), 2);
    assert_eq!(repo.find_by_first_name("jOhN").unwrap().len(), 1);
    assert!(repo.find_by_first_name("Jo").unwrap().is_empty());
}

#[test]
fn find_all_returns_rows_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    for (first, email) in [("C", "c@x.com"), ("A", "a@x.com"), ("B", "b@x.com")] {
        repo.insert(&new_employee(first, "Z", email, "D")).unwrap();
    }

    let names: Vec<_> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .map(|employee| employee.first_name)
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

#[test]
fn delete_by_email_reports_removed_rows_and_is_noop_when_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    repo.insert(&new_employee("John", "Smith", "john@x.com", "Compro"))
        .unwrap();

    assert_eq!(repo.delete_by_email("john@x.com").unwrap(), 1);
    assert!(repo.find_by_email("john@x.com").unwrap().is_none());
    assert_eq!(repo.delete_by_email("john@x.com").unwrap(), 0);
    assert_eq!(repo.delete_by_email("never@x.com").unwrap(), 0);
}

#[test]
fn save_updates_existing_row_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let mut employee = repo
        .insert(&new_employee("John", "Smith", "john.smith@gmail.com", "Compro"))
        .unwrap();

    employee.department_code = "Sec".to_string();
    repo.save(&employee).unwrap();

    let loaded = repo.find_by_email("john.smith@gmail.com").unwrap().unwrap();
    assert_eq!(loaded.id, employee.id);
    assert_eq!(loaded.department_code, "Sec");
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn save_can_change_email_of_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let mut employee = repo
        .insert(&new_employee("John", "Smith", "old@x.com", "Compro"))
        .unwrap();

    employee.email = "new@x.com".to_string();
    repo.save(&employee).unwrap();

    assert!(repo.find_by_email("old@x.com").unwrap().is_none());
    assert_eq!(repo.find_by_email("new@x.com").unwrap().unwrap().id, employee.id);
}

#[test]
fn save_onto_taken_email_fails_with_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    repo.insert(&new_employee("Jane", "Smith", "jane@x.com", "Compro"))
        .unwrap();
    let mut john = repo
        .insert(&new_employee("John", "Smith", "john@x.com", "Compro"))
        .unwrap();

    john.email = "jane@x.com".to_string();
    let err = repo.save(&john).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation { .. }));
    assert_eq!(repo.find_by_email("john@x.com").unwrap().unwrap().id, john.id);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEmployeeRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_employees_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEmployeeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("employees"))
    ));
}

#[test]
fn repository_rejects_employees_table_missing_department_code() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEmployeeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: "department_code"
        })
    ));
}
