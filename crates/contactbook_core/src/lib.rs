//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants and
//! query semantics.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingOptions};
pub use model::contact::{Contact, ContactId, ContactInput};
pub use model::validation::ValidationError;
pub use repo::contact_repo::{
    ContactListQuery, ContactRepository, RepoError, RepoResult, SortKey, SortOrder,
    SqliteContactRepository,
};
pub use search::birthdays::{BirthdayWindow, BirthdayWindowMode};
pub use search::filter::{ContactSearch, SearchMode};
pub use service::contact_service::{ContactService, ContactServiceOptions};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
