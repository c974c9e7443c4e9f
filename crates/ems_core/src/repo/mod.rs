//! Storage gateway contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence primitives the employee service consumes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Uniqueness violations surface as `RepoError::ConstraintViolation`, never
//!   as a raw SQLite error.

pub mod employee_repo;
