//! Core use-case services.
//!
//! # Responsibility
//! - Enforce business rules above the storage gateway.
//! - Keep boundary layers decoupled from storage details.

pub mod employee_service;
