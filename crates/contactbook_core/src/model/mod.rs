//! Domain model for the contact book.
//!
//! # Responsibility
//! - Define the single `Contact` entity and its create/update input shape.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - `id` is assigned by storage once and never reused or mutated.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod contact;
pub mod validation;
