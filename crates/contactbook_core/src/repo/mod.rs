//! Repository layer for contact persistence.
//!
//! # Responsibility
//! - Define the contact data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate `ContactInput` before any SQL mutation.
//! - Missing ids surface as `RepoError::NotFound`, never as empty results.

pub mod contact_repo;
