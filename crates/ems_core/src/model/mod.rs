//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the stored entity and the request/response shapes around it.
//! - Own field-level validation rules for create and full-update payloads.
//!
//! # Invariants
//! - Every stored employee is identified by a gateway-assigned `EmployeeId`.
//! - Deletion is physical; there are no tombstones.

pub mod employee;
