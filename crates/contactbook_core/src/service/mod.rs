//! Contact use cases on top of a repository.
//!
//! The HTTP layer talks to `ContactService` only; it never sees SQL.

pub mod contact_service;
